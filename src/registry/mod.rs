//! Registry module for Google Container Registry interactions
//!
//! This module provides identity token acquisition and client logic for the Docker Registry HTTP API v2
//! calls a pruning run makes: token exchange, tag listing and manifest deletion.

pub mod auth;
pub mod client;
pub mod manifest;

pub use auth::{CommandCredentialSource, CredentialSource};
pub use client::{DeleteResponse, RegistryApi, RegistryClient, RegistryClientBuilder};
pub use manifest::ManifestRecord;
