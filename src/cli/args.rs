//! Command-line argument parsing

use crate::error::{PrunerError, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "gcr-pruner")]
#[command(about = "Delete all but the most recently uploaded images of a GCR repository")]
#[command(version)]
pub struct Args {
    /// Repository to prune
    #[arg(
        long = "repository",
        short = 'r',
        help = "Repository without scheme, e.g. gcr.io/my-project/my-image"
    )]
    pub repository: Option<String>,

    /// Number of most recent images to keep (default: 5)
    #[arg(
        long = "keep",
        short = 'k',
        allow_negative_numbers = true,
        help = "Number of most recently uploaded images to keep"
    )]
    pub keep: Option<i64>,

    /// Command printing an identity token
    #[arg(
        long = "token-command",
        help = "Command that prints an access token (default: gcloud auth print-access-token)"
    )]
    pub token_command: Option<String>,

    /// Dry run mode (plan without deleting)
    #[arg(
        long = "dry-run",
        short = 'n',
        help = "List images that would be deleted without deleting them"
    )]
    pub dry_run: bool,

    /// Output format for the final report
    #[arg(
        long = "output",
        short = 'o',
        value_enum,
        default_value = "text",
        help = "Output format: text, json"
    )]
    pub output: OutputFormat,

    /// Verbose output
    #[arg(long = "verbose", short = 'v', help = "Enable verbose output")]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Fill in values not given on the command line from environment variables
    pub fn from_env(self) -> Result<Self> {
        self.with_env(|key| std::env::var(key).ok())
    }

    /// Apply `GCR_PRUNER_*` overrides read through `lookup`
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.repository.is_none() {
            self.repository = lookup("GCR_PRUNER_REPOSITORY");
        }

        if self.keep.is_none() {
            if let Some(keep) = lookup("GCR_PRUNER_KEEP") {
                let keep = keep.trim().parse().map_err(|_| {
                    PrunerError::Configuration(format!(
                        "GCR_PRUNER_KEEP must be a positive integer, got '{}'",
                        keep
                    ))
                })?;
                self.keep = Some(keep);
            }
        }

        if self.token_command.is_none() {
            self.token_command = lookup("GCR_PRUNER_TOKEN_COMMAND");
        }

        if let Some(val) = lookup("GCR_PRUNER_VERBOSE") {
            if val.to_lowercase() == "true" || val == "1" {
                self.verbose = true;
            }
        }

        Ok(self)
    }
}
