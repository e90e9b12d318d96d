//! Archive builder: backup set derivation, staging, and zip output.

pub mod copier;
pub mod staging;
pub mod zip;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::catalog::{self, digest::Digest, ModelEntry};
use crate::utils::errors::Result;

/// The working set for one run: the selected models and the unique files they
/// depend on. Built per invocation, never persisted.
#[derive(Debug, Clone)]
pub struct BackupSet {
    /// Display names of the selected models, enumeration order.
    pub models: Vec<String>,

    /// Unique manifest paths relative to `manifests/`, selection order.
    pub manifests: Vec<PathBuf>,

    /// Unique blob digests across all selected models, first-reference order.
    /// Uniqueness here is what guarantees each shared blob is copied once.
    pub blobs: Vec<Digest>,

    /// Combined size of the unique blobs, for the summary.
    pub total_blob_bytes: u64,
}

/// Resolve every selected model and fold the results into a deduplicated
/// `BackupSet`. Fails on the first unresolvable model, before anything is
/// copied or written.
pub fn build_backup_set(catalog_root: &Path, selected: &[&ModelEntry]) -> Result<BackupSet> {
    let mut models = Vec::new();
    let mut manifests = Vec::new();
    let mut blobs = Vec::new();
    let mut seen_manifests = HashSet::new();
    let mut seen_blobs = HashSet::new();
    let mut total_blob_bytes = 0u64;

    for entry in selected {
        let deps = catalog::resolve_dependencies(catalog_root, entry)?;
        models.push(entry.name.clone());

        if seen_manifests.insert(deps.manifest_relative.clone()) {
            manifests.push(deps.manifest_relative);
        }
        for digest in deps.digests {
            if seen_blobs.insert(digest.clone()) {
                total_blob_bytes += std::fs::metadata(digest.blob_path(catalog_root))?.len();
                blobs.push(digest);
            }
        }
    }

    Ok(BackupSet {
        models,
        manifests,
        blobs,
        total_blob_bytes,
    })
}
