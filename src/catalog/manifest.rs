//! The Ollama manifest document.
//!
//! A manifest lists a model's component layers by content digest. The format
//! is owned by the Ollama daemon; parsing here is deliberately lenient and
//! only the digests carry logic — media types are descriptive.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::errors::{BackupError, Result};

/// Manifest document as stored under `manifests/<registry>/<namespace>/<name>/<tag>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub media_type: String,
    /// Model configuration blob; a dependency exactly like the layers.
    pub config: Option<Layer>,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

/// One layer reference inside a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    #[serde(default)]
    pub media_type: String,
    pub digest: String,
    #[serde(default)]
    pub size: u64,
}

impl Manifest {
    /// Load and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| BackupError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// All referenced digests, config first, in document order.
    pub fn digests(&self) -> impl Iterator<Item = &str> {
        self.config
            .iter()
            .chain(self.layers.iter())
            .map(|layer| layer.digest.as_str())
    }
}
