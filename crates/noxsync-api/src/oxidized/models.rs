// Oxidized web API response types
//
// `nodes?format=json` returns a bare array. Only the identity and model
// fields drive the sync; run metadata is kept for logging.

use serde::{Deserialize, Serialize};

/// A node (backed-up device) from `GET /nodes?format=json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    /// `group/name` when the node belongs to a group, else the bare name.
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    /// Oxidized model name, e.g. `FortiOS`, `IOS`.
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Last backup run. `null` for nodes that were never fetched.
    #[serde(default)]
    pub last: Option<LastRun>,
}

impl Node {
    /// The path segment Oxidized expects for `node/fetch/…`.
    pub fn fetch_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }
}

/// Metadata about a node's most recent backup run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastRun {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub time: Option<f64>,
}
