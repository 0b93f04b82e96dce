//! Run configuration resolved from command line arguments

use crate::cli::args::{Args, OutputFormat};
use crate::error::handlers::ValidationErrorHandler;
use crate::error::{PrunerError, Result};
use crate::logging::Logger;
use url::Url;

pub const DEFAULT_KEEP: i64 = 5;
pub const DEFAULT_TOKEN_COMMAND: &str = "gcloud auth print-access-token";

/// Repository location on an allowed registry host, e.g. `gcr.io/project/app`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryUrl {
    url: Url,
}

impl RepositoryUrl {
    pub fn parse(repository: &str) -> Result<Self> {
        let repository = repository.trim().trim_end_matches('/');
        let url = Url::parse(&format!("https://{}", repository)).map_err(|e| {
            PrunerError::Configuration(format!("Invalid repository '{}': {}", repository, e))
        })?;

        let host = url.host_str().ok_or_else(|| {
            PrunerError::Configuration(format!("Repository '{}' has no hostname", repository))
        })?;
        ValidationErrorHandler::validate_registry_host(host)?;
        ValidationErrorHandler::validate_repository_path(url.path())?;

        Ok(Self { url })
    }

    /// Registry hostname, also used as the token `service`
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Repository path with a leading slash, e.g. `/project/app`
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Repository name as used in token scopes, e.g. `project/app`
    pub fn name(&self) -> &str {
        self.path().trim_start_matches('/')
    }

    /// `https://<host>`
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Fully-qualified reference for a manifest, e.g. `gcr.io/project/app@sha256:...`
    pub fn image_reference(&self, digest: &str) -> String {
        format!("{}{}@{}", self.host(), self.path(), digest)
    }
}

impl std::fmt::Display for RepositoryUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.host(), self.path())
    }
}

/// Validated, immutable settings for one pruning run
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    pub repository: RepositoryUrl,
    pub keep: usize,
    pub token_command: Vec<String>,
    pub dry_run: bool,
    pub output: OutputFormat,
    pub verbose: bool,
}

impl RetentionConfig {
    pub fn new(repository: RepositoryUrl, keep: usize) -> Self {
        Self {
            repository,
            keep,
            token_command: split_command(DEFAULT_TOKEN_COMMAND),
            dry_run: false,
            output: OutputFormat::Text,
            verbose: false,
        }
    }

    pub fn from_args(args: &Args) -> Result<Self> {
        let repository = args.repository.as_deref().ok_or_else(|| {
            PrunerError::Configuration("Repository must be provided (--repository)".to_string())
        })?;
        let repository = RepositoryUrl::parse(repository)?;
        let keep = ValidationErrorHandler::validate_keep(args.keep.unwrap_or(DEFAULT_KEEP))?;

        let token_command =
            split_command(args.token_command.as_deref().unwrap_or(DEFAULT_TOKEN_COMMAND));
        if token_command.is_empty() {
            return Err(PrunerError::Configuration(
                "Token command cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            repository,
            keep,
            token_command,
            dry_run: args.dry_run,
            output: args.output,
            verbose: args.verbose,
        })
    }

    /// Logger for this run; progress moves to stderr when stdout carries JSON
    pub fn logger(&self) -> Logger {
        match self.output {
            OutputFormat::Json => Logger::new_stderr(self.verbose),
            OutputFormat::Text => Logger::new(self.verbose),
        }
    }
}

fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(repository: Option<&str>, keep: Option<i64>) -> Args {
        Args {
            repository: repository.map(str::to_string),
            keep,
            token_command: None,
            dry_run: false,
            output: OutputFormat::Text,
            verbose: false,
        }
    }

    #[test]
    fn parses_repository_components() {
        let repo = RepositoryUrl::parse("eu.gcr.io/my-project/api/").unwrap();
        assert_eq!(repo.host(), "eu.gcr.io");
        assert_eq!(repo.path(), "/my-project/api");
        assert_eq!(repo.name(), "my-project/api");
        assert_eq!(repo.origin(), "https://eu.gcr.io");
        assert_eq!(
            repo.image_reference("sha256:abc"),
            "eu.gcr.io/my-project/api@sha256:abc"
        );
        assert_eq!(repo.to_string(), "eu.gcr.io/my-project/api");
    }

    #[test]
    fn rejects_disallowed_hosts_and_empty_paths() {
        assert!(RepositoryUrl::parse("docker.io/library/nginx").is_err());
        assert!(RepositoryUrl::parse("gcr.io").is_err());
        assert!(RepositoryUrl::parse("gcr.io/").is_err());
        assert!(RepositoryUrl::parse("").is_err());
    }

    #[test]
    fn keep_defaults_to_five() {
        let config = RetentionConfig::from_args(&args(Some("gcr.io/p/app"), None)).unwrap();
        assert_eq!(config.keep, 5);
        assert_eq!(
            config.token_command,
            vec!["gcloud", "auth", "print-access-token"]
        );
    }

    #[test]
    fn missing_repository_and_bad_keep_are_configuration_errors() {
        assert!(matches!(
            RetentionConfig::from_args(&args(None, Some(3))),
            Err(PrunerError::Configuration(_))
        ));
        assert!(matches!(
            RetentionConfig::from_args(&args(Some("gcr.io/p/app"), Some(0))),
            Err(PrunerError::Configuration(_))
        ));
        assert!(RetentionConfig::from_args(&args(Some("gcr.io/p/app"), Some(-1))).is_err());
    }

    #[test]
    fn json_output_moves_progress_to_stderr() {
        let mut json = args(Some("gcr.io/p/app"), None);
        json.output = OutputFormat::Json;
        assert!(RetentionConfig::from_args(&json).unwrap().logger().stderr);

        let text = args(Some("gcr.io/p/app"), None);
        assert!(!RetentionConfig::from_args(&text).unwrap().logger().stderr);
    }
}
