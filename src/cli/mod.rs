//! Command line interface module
//!
//! This module provides argument parsing, configuration validation and the runner that
//! drives a pruning run from credential acquisition to the final report.

pub mod args;
pub mod config;
pub mod runner;

pub use args::{Args, OutputFormat};
pub use config::{RepositoryUrl, RetentionConfig};
pub use runner::Runner;
