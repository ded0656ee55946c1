//! Terminal styling helpers

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Semantic colours for CLI output
pub trait Stylize {
    /// De-emphasized text
    fn muted(&self) -> String;
    /// Warnings and blocked outcomes
    fn warn(&self) -> String;
    /// Identifiers such as PR references
    fn accent(&self) -> String;
    /// Successful outcomes
    fn success(&self) -> String;
    /// Failures
    fn failure(&self) -> String;
}

impl<T: Display + ?Sized> Stylize for T {
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn failure(&self) -> String {
        self.red().to_string()
    }
}
