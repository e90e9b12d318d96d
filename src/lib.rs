//! Ollama Backup Library
//!
//! Selective backup of locally installed Ollama models: resolves each chosen
//! model's manifest to its content-addressed blobs, stages a deduplicated
//! copy mirroring the store layout, and zips it into a single archive.

pub mod archive;
pub mod backup;
pub mod catalog;
pub mod config;
pub mod select;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use utils::errors::BackupError;
pub type Result<T> = std::result::Result<T, BackupError>;
