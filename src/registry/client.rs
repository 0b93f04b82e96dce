//! Registry HTTP client
//!
//! Implements the three Docker Registry v2 calls a pruning run needs:
//! - Token exchange (GET /v2/token)
//! - Tag listing with GCR manifest metadata (GET /v2/{name}/tags/list)
//! - Manifest deletion (DELETE /v2/{name}/manifests/{digest})

use crate::cli::config::RepositoryUrl;
use crate::error::handlers::{HttpErrorHandler, NetworkErrorHandler};
use crate::error::{PrunerError, Result};
use crate::logging::Logger;
use crate::registry::manifest::{ManifestRecord, parse_tag_list};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, LINK};
use serde::Deserialize;

/// Maximum number of tag list entries requested in one call
pub const TAG_LIST_PAGE_SIZE: u32 = 99;

/// Raw result of a manifest DELETE that reached the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResponse {
    pub status: u16,
    pub body: String,
}

/// Registry operations used by a pruning run
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Exchange an identity token for a registry token scoped to the repository
    async fn exchange_token(&self, identity_token: &str) -> Result<String>;

    async fn list_manifests(&self, token: &str) -> Result<Vec<ManifestRecord>>;

    /// Issue a DELETE for one manifest. `Err` means the request never got a response.
    async fn delete_manifest(&self, digest: &str, token: &str) -> Result<DeleteResponse>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
    access_token: Option<String>,
}

pub struct RegistryClientBuilder {
    repository: RepositoryUrl,
    address: Option<String>,
    output: Option<Logger>,
}

impl RegistryClientBuilder {
    pub fn new(repository: RepositoryUrl) -> Self {
        Self {
            repository,
            address: None,
            output: None,
        }
    }

    /// Override the registry origin (defaults to `https://<repository host>`)
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_output(mut self, output: Logger) -> Self {
        self.output = Some(output);
        self
    }

    pub fn build(self) -> Result<RegistryClient> {
        let client = Client::builder()
            .build()
            .map_err(|e| PrunerError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let address = self
            .address
            .unwrap_or_else(|| self.repository.origin())
            .trim_end_matches('/')
            .to_string();

        Ok(RegistryClient {
            client,
            address,
            repository: self.repository,
            output: self.output.unwrap_or_else(|| Logger::new(false)),
        })
    }
}

#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    address: String,
    repository: RepositoryUrl,
    output: Logger,
}

impl RegistryClient {
    pub fn builder(repository: RepositoryUrl) -> RegistryClientBuilder {
        RegistryClientBuilder::new(repository)
    }
}

#[async_trait]
impl RegistryApi for RegistryClient {
    async fn exchange_token(&self, identity_token: &str) -> Result<String> {
        let url = format!("{}/v2/token", self.address);
        let scope = format!("repository:{}:push,pull", self.repository.name());
        self.output
            .detail(&format!("Requesting registry token from {} (scope {})", url, scope));

        let response = self
            .client
            .get(&url)
            .bearer_auth(identity_token)
            .header(ACCEPT, "application/json")
            .query(&[("scope", scope.as_str()), ("service", self.repository.host())])
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "token exchange"))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(HttpErrorHandler::handle_auth_error(status, &error_text));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| PrunerError::Parse(format!("Failed to parse token response: {}", e)))?;

        token_response
            .token
            .or(token_response.access_token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                PrunerError::Authentication("Token response did not contain a token".to_string())
            })
    }

    async fn list_manifests(&self, token: &str) -> Result<Vec<ManifestRecord>> {
        let url = format!("{}/v2{}/tags/list", self.address, self.repository.path());
        self.output
            .verbose(&format!("Listing manifests for repository: {}", self.repository));

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .query(&[("n", TAG_LIST_PAGE_SIZE)])
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "tag listing"))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(HttpErrorHandler::handle_registry_error(
                status,
                &error_text,
                "tag listing",
            ));
        }

        if response.headers().contains_key(LINK) {
            self.output.warning(&format!(
                "Registry reports more results; only the first {} entries are considered",
                TAG_LIST_PAGE_SIZE
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PrunerError::Network(format!("Failed to read tag list response: {}", e)))?;
        let manifests = parse_tag_list(&body)?;

        self.output.detail(&format!(
            "Found {} manifests in {}",
            manifests.len(),
            self.repository
        ));
        Ok(manifests)
    }

    async fn delete_manifest(&self, digest: &str, token: &str) -> Result<DeleteResponse> {
        let url = format!(
            "{}/v2{}/manifests/{}",
            self.address,
            self.repository.path(),
            digest
        );

        let response = self
            .client
            .delete(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "manifest deletion"))?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        self.output
            .detail(&format!("DELETE {} -> {}", digest, status));

        Ok(DeleteResponse { status, body })
    }
}
