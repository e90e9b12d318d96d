//! Configuration for a backup run.
//!
//! There is no config file and no ambient global state: the catalog root and
//! output directory are resolved once at startup and threaded explicitly
//! through every call that needs them.

use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::utils::errors::{BackupError, Result};

/// Environment variable the Ollama daemon itself honors for a relocated store.
pub const CATALOG_ENV: &str = "OLLAMA_MODELS";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory of the Ollama model store (contains `manifests/` and `blobs/`)
    pub catalog_root: PathBuf,

    /// Directory the archive is written to
    pub output_dir: PathBuf,
}

impl Config {
    /// Resolve the configuration from CLI overrides, the `OLLAMA_MODELS`
    /// environment variable, and the well-known default store locations, in
    /// that order. The first existing valid catalog root wins.
    pub fn discover(
        catalog_override: Option<PathBuf>,
        output_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let catalog_root = match catalog_override {
            Some(path) => {
                if !is_catalog_root(&path) {
                    return Err(BackupError::CatalogNotFound(format!(
                        "{} does not contain both manifests/ and blobs/ subdirectories",
                        path.display()
                    )));
                }
                path
            }
            None => detect_catalog_root()?,
        };

        let output_dir = match output_dir {
            Some(dir) => dir,
            None => env::current_dir()?,
        };
        if !output_dir.is_dir() {
            return Err(BackupError::ArchiveWrite {
                path: output_dir.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "output directory does not exist",
                ),
            });
        }

        Ok(Self {
            catalog_root,
            output_dir,
        })
    }
}

/// A valid catalog root holds both the `manifests/` and `blobs/` subtrees.
pub fn is_catalog_root(path: &Path) -> bool {
    path.join("manifests").is_dir() && path.join("blobs").is_dir()
}

fn detect_catalog_root() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(CATALOG_ENV) {
        let dir = PathBuf::from(dir);
        if is_catalog_root(&dir) {
            debug!("using catalog root from {}: {}", CATALOG_ENV, dir.display());
            return Ok(dir);
        }
        warn!(
            "{} is set to {}, but manifests/ or blobs/ is missing there",
            CATALOG_ENV,
            dir.display()
        );
    }

    for path in default_catalog_paths() {
        if is_catalog_root(&path) {
            debug!("using default catalog root {}", path.display());
            return Ok(path);
        }
    }

    Err(BackupError::CatalogNotFound(format!(
        "no valid store in {} or the default locations; is Ollama installed with models pulled?",
        CATALOG_ENV
    )))
}

/// Well-known store locations, checked in order after the env override.
fn default_catalog_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(".ollama").join("models"));
    }
    paths.push(PathBuf::from("/usr/share/ollama/.ollama/models"));
    paths.push(PathBuf::from("/var/lib/ollama/.ollama/models"));
    paths
}
