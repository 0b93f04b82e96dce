//! GCR Pruner Library
//!
//! This file serves as the library root for the gcr-pruner crate,
//! organizing and exposing the modules that make up the application.

pub mod cli;
pub mod error;
pub mod logging;
pub mod registry;
pub mod retention;

pub use cli::{Args, RepositoryUrl, RetentionConfig, Runner};
pub use error::{PrunerError, Result};
pub use logging::Logger;
