//! Custom error types for the backup tool.
//!
//! Every variant here is fatal to the run: the errors stem from user input or
//! environment state, so nothing is retried. The staging tree is removed
//! before the process exits regardless of which variant aborted the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("no model catalog found: {0}")]
    CatalogNotFound(String),

    #[error("invalid model selection: {0}")]
    Selection(String),

    #[error("model {model}: blob {digest} is missing from the blob store (expected {path})")]
    DependencyMissing {
        model: String,
        digest: String,
        path: PathBuf,
    },

    #[error("malformed digest {digest:?} in manifest: {reason}")]
    BadDigest { digest: String, reason: String },

    #[error("invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write archive {path}: {source}")]
    ArchiveWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("interrupted")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BackupError>;
