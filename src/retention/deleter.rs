//! Batched manifest deletion
//!
//! Candidates are deleted in fixed groups of [`DELETE_BATCH_SIZE`]: every request in a
//! group is issued concurrently and the whole group settles before the next one starts,
//! so at most three DELETEs are in flight against the registry. The size is a plain
//! bound on concurrency, not a tuned value.

use crate::cli::config::RepositoryUrl;
use crate::logging::Logger;
use crate::registry::{DeleteResponse, ManifestRecord, RegistryApi};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub const DELETE_BATCH_SIZE: usize = 3;

/// Registry status for an accepted manifest deletion
pub const DELETE_ACCEPTED: u16 = 202;

/// Result of one deletion attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum DeletionOutcome {
    Success {
        image: String,
    },
    Failure {
        image: String,
        /// `None` when no response was received
        status: Option<u16>,
        reason: String,
    },
}

impl DeletionOutcome {
    pub fn image(&self) -> &str {
        match self {
            DeletionOutcome::Success { image } | DeletionOutcome::Failure { image, .. } => image,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            DeletionOutcome::Success { .. } => Some(DELETE_ACCEPTED),
            DeletionOutcome::Failure { status, .. } => *status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeletionOutcome::Success { .. })
    }
}

impl std::fmt::Display for DeletionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeletionOutcome::Success { image } => write!(f, "{}", image),
            DeletionOutcome::Failure { image, reason, .. } => write!(f, "{} ({})", image, reason),
        }
    }
}

pub struct BatchDeleter {
    registry: Arc<dyn RegistryApi>,
    repository: RepositoryUrl,
    output: Logger,
}

impl BatchDeleter {
    pub fn new(registry: Arc<dyn RegistryApi>, repository: RepositoryUrl, output: Logger) -> Self {
        Self {
            registry,
            repository,
            output,
        }
    }

    /// Delete every candidate, returning one outcome per candidate in input order.
    ///
    /// A failed deletion never stops its siblings or later batches.
    pub async fn delete_all(&self, candidates: &[ManifestRecord], token: &str) -> Vec<DeletionOutcome> {
        let mut outcomes = Vec::with_capacity(candidates.len());
        let total_batches = candidates.len().div_ceil(DELETE_BATCH_SIZE);

        for (index, batch) in candidates.chunks(DELETE_BATCH_SIZE).enumerate() {
            self.output.step(&format!(
                "Deleting batch {}/{} ({} images)",
                index + 1,
                total_batches,
                batch.len()
            ));

            let results = join_all(batch.iter().map(|manifest| self.delete_one(manifest, token))).await;
            outcomes.extend(results);
        }

        outcomes
    }

    async fn delete_one(&self, manifest: &ManifestRecord, token: &str) -> DeletionOutcome {
        let image = self.repository.image_reference(&manifest.digest);

        match self.registry.delete_manifest(&manifest.digest, token).await {
            Ok(DeleteResponse { status, .. }) if status == DELETE_ACCEPTED => {
                self.output.verbose(&format!("Deleted {}", image));
                DeletionOutcome::Success { image }
            }
            Ok(DeleteResponse { status, body }) => {
                let reason = format!("status: {}, body: {}", status, serialize_error_body(&body));
                self.output
                    .warning(&format!("Failed to delete {}: {}", image, reason));
                DeletionOutcome::Failure {
                    image,
                    status: Some(status),
                    reason,
                }
            }
            Err(e) => {
                self.output
                    .warning(&format!("Failed to delete {}: {}", image, e));
                DeletionOutcome::Failure {
                    image,
                    status: None,
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Compact JSON rendering of a registry error body; non-JSON text becomes a JSON string
fn serialize_error_body(body: &str) -> String {
    let value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
    };
    value.to_string()
}
