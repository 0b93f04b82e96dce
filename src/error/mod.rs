//! Error types and handlers for pruning operations

pub mod handlers;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrunerError>;

#[derive(Error, Debug)]
pub enum PrunerError {
    /// Invalid or missing command line / environment configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The identity token command failed or reported diagnostics
    #[error("Credential error: {0}")]
    Credential(String),
    /// Registry token exchange failed
    #[error("Authentication error: {0}")]
    Authentication(String),
    /// Registry rejected a request
    #[error("Registry error: {0}")]
    Registry(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
    /// Writing the report failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for PrunerError {
    fn from(err: reqwest::Error) -> Self {
        PrunerError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for PrunerError {
    fn from(err: serde_json::Error) -> Self {
        PrunerError::Parse(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for PrunerError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        PrunerError::Parse(format!("UTF-8 conversion error: {}", err))
    }
}
