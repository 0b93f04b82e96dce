//! Logging and output control
//!
//! This module provides the [`Logger`] for controlling output verbosity and formatting logs.
//! Every component receives a clone of the same logger. When the final report is machine
//! readable, progress goes to stderr so stdout carries the report alone.

use std::fmt::Arguments;
use std::time::Duration;

/// Logger responsible for all user-visible output
#[derive(Debug, Clone)]
pub struct Logger {
    pub verbose: bool,
    pub stderr: bool,
}

impl Logger {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            stderr: false,
        }
    }

    /// Logger that writes every line to stderr
    pub fn new_stderr(verbose: bool) -> Self {
        Self {
            verbose,
            stderr: true,
        }
    }

    fn emit(&self, line: Arguments<'_>) {
        if self.stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    /// Main section heading
    pub fn section(&self, title: &str) {
        self.emit(format_args!("\n=== {} ===", title));
    }

    /// Sub-section heading
    pub fn subsection(&self, title: &str) {
        self.emit(format_args!("\n--- {} ---", title));
    }

    pub fn verbose(&self, message: &str) {
        if self.verbose {
            self.emit(format_args!("📝 {}", message));
        }
    }

    /// Information message
    pub fn info(&self, message: &str) {
        self.emit(format_args!("ℹ️  {}", message));
    }

    /// Success message
    pub fn success(&self, message: &str) {
        self.emit(format_args!("✅ {}", message));
    }

    /// Warning message
    pub fn warning(&self, message: &str) {
        self.emit(format_args!("⚠️  WARNING: {}", message));
    }

    /// Error message
    pub fn error(&self, message: &str) {
        eprintln!("❌ ERROR: {}", message);
    }

    /// Step information
    pub fn step(&self, message: &str) {
        self.emit(format_args!("▶️  {}", message));
    }

    /// Detailed information (only shown in verbose mode)
    pub fn detail(&self, message: &str) {
        if self.verbose {
            self.emit(format_args!("   {}", message));
        }
    }

    // Summary method for displaying structured information
    pub fn summary(&self, title: &str, items: &[String]) {
        self.emit(format_args!("\n📋 {}", title));
        self.emit(format_args!("{}", "─".repeat(title.len() + 3)));

        for item in items {
            self.emit(format_args!("  • {}", item));
        }

        if items.is_empty() {
            self.emit(format_args!("  (No items to display)"));
        }
    }

    // Structured list output
    pub fn list(&self, title: &str, items: &[String]) {
        self.subsection(title);
        for (i, item) in items.iter().enumerate() {
            self.emit(format_args!("  {}. {}", i + 1, item));
        }

        if items.is_empty() {
            self.emit(format_args!("  (No items to display)"));
        }
    }

    /// Format duration in human-readable format
    pub fn format_duration(&self, duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs < 60 {
            format!("{:.1}s", duration.as_secs_f64())
        } else if secs < 3600 {
            format!("{}m{}s", secs / 60, secs % 60)
        } else {
            format!("{}h{}m{}s", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_are_human_readable() {
        let logger = Logger::new(false);
        assert_eq!(logger.format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(logger.format_duration(Duration::from_secs(125)), "2m5s");
        assert_eq!(logger.format_duration(Duration::from_secs(3725)), "1h2m5s");
    }

    #[test]
    fn stderr_logger_keeps_verbosity() {
        let logger = Logger::new_stderr(true);
        assert!(logger.stderr);
        assert!(logger.verbose);
        assert!(!Logger::new(true).stderr);
    }
}
