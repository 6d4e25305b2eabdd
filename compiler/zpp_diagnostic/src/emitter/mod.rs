//! Diagnostic emitters.

mod terminal;

pub use terminal::{report_and_exit, ColorMode, TerminalEmitter};
