//! Terminal output helpers.

use crossterm::style::Stylize;
use std::fmt::Display;

/// Prints user-facing status lines; `--quiet` silences everything but
/// warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    quiet: bool,
}

impl Output {
    /// Create an output sink.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Report a completed step.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", success_line(msg));
        }
    }

    /// Report neutral information.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("    {}", msg.dark_grey());
        }
    }

    /// Print an aligned `label: value` line.
    pub fn field(&self, label: &str, value: impl Display) {
        if !self.quiet {
            println!("{}", field_line(label, value));
        }
    }

    /// Report something the user should look at. Always shown.
    pub fn warning(&self, msg: &str) {
        eprintln!("{}", warning_line(msg));
    }
}

fn success_line(msg: &str) -> String {
    format!("{} {}", "✓".green(), msg.green())
}

fn warning_line(msg: &str) -> String {
    format!("{} {}", "!".yellow(), msg.yellow())
}

fn field_line(label: &str, value: impl Display) -> String {
    let label = format!("{label:<14}");
    format!("  {} {value}", label.dark_grey())
}
