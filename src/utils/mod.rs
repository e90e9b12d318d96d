//! Utility modules for the backup tool.

pub mod errors;
pub mod fmt;
pub mod logger;

pub use errors::{BackupError, Result};
