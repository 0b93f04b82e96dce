//! Manifest records decoded from the registry tag list
//!
//! GCR extends the Docker Registry v2 `tags/list` response with a `manifest`
//! object keyed by digest. Upload timestamps are served as decimal strings,
//! so both strings and numbers are accepted.

use crate::error::{PrunerError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One image manifest in the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestRecord {
    pub digest: String,
    pub time_uploaded_ms: u64,
    pub tags: Vec<String>,
}

impl ManifestRecord {
    pub fn new(digest: impl Into<String>, time_uploaded_ms: u64) -> Self {
        Self {
            digest: digest.into(),
            time_uploaded_ms,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestEntry {
    #[serde(deserialize_with = "deserialize_millis")]
    time_uploaded_ms: u64,
    #[serde(default)]
    tag: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TagListResponse {
    #[serde(default)]
    manifest: Map<String, Value>,
}

/// Decode a tag list body into manifest records, preserving response order
pub fn parse_tag_list(body: &str) -> Result<Vec<ManifestRecord>> {
    let response: TagListResponse = serde_json::from_str(body)
        .map_err(|e| PrunerError::Parse(format!("Failed to parse tag list response: {}", e)))?;

    response
        .manifest
        .into_iter()
        .map(|(digest, value)| {
            let entry: ManifestEntry = serde_json::from_value(value).map_err(|e| {
                PrunerError::Parse(format!("Invalid manifest entry {}: {}", digest, e))
            })?;
            Ok(ManifestRecord {
                digest,
                time_uploaded_ms: entry.time_uploaded_ms,
                tags: entry.tag,
            })
        })
        .collect()
}

fn deserialize_millis<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Millis {
        Number(u64),
        Text(String),
    }

    match Millis::deserialize(deserializer)? {
        Millis::Number(ms) => Ok(ms),
        Millis::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
