//! Diagnostic system for the generator's fail-fast error reporting.
//!
//! A diagnostic carries:
//! - an error code for searchability
//! - a message saying what went wrong
//! - the position it went wrong at
//! - optional notes
//!
//! Compilation stops at the first error; [`emitter::report_and_exit`] is
//! the driver-side helper that prints it with the offending source line and
//! a caret, then terminates the process.

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
