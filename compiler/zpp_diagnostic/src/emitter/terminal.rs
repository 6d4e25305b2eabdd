//! Terminal emitter.
//!
//! Output shape:
//!
//! ```text
//! error[E2001]: expected type `i32`, got `u8`
//!   'src/main.zpp' [line: 3, col: 12]
//!   + x: i32 = y
//!   +          ^
//! ```

use std::io::{self, Write};

use zpp_ir::SourceMap;

use crate::{Diagnostic, Severity};

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn paint(&self, color: &'static str) -> &'static str {
        if self.colors {
            color
        } else {
            ""
        }
    }

    pub fn emit(&mut self, diag: &Diagnostic, sources: &SourceMap) -> io::Result<()> {
        let severity_color = match diag.severity {
            Severity::Error => colors::ERROR,
            Severity::Note => colors::NOTE,
        };
        writeln!(
            self.writer,
            "{}{}[{}]{}{}: {}{}",
            self.paint(severity_color),
            diag.severity,
            diag.code,
            self.paint(colors::RESET),
            self.paint(colors::BOLD),
            diag.message,
            self.paint(colors::RESET),
        )?;

        if let Some(pos) = diag.pos {
            let file = sources.get(pos.file);
            let path = file.map_or_else(
                || "<unknown>".to_string(),
                |f| f.path.display().to_string(),
            );
            let gutter = self.paint(colors::SECONDARY);
            let reset = self.paint(colors::RESET);
            writeln!(
                self.writer,
                "  {gutter}'{path}' [line: {}, col: {}]{reset}",
                pos.line, pos.col
            )?;
            if let Some(line) = file.and_then(|f| f.line(pos.line)) {
                let pad = " ".repeat(pos.col.saturating_sub(1) as usize);
                writeln!(self.writer, "  {gutter}+{reset} {line}")?;
                writeln!(self.writer, "  {gutter}+{reset} {pad}^")?;
            }
        }

        for note in &diag.notes {
            writeln!(
                self.writer,
                "  {}= note{}: {note}",
                self.paint(colors::NOTE),
                self.paint(colors::RESET)
            )?;
        }
        Ok(())
    }
}

/// Print `diag` to stderr and terminate the process with status 1.
pub fn report_and_exit(diag: &Diagnostic, sources: &SourceMap) -> ! {
    let stderr = io::stderr();
    let mut emitter = TerminalEmitter::with_color_mode(stderr.lock(), ColorMode::Never, false);
    // Nothing useful can be done if stderr itself is gone.
    let _ = emitter.emit(diag, sources);
    std::process::exit(1)
}
