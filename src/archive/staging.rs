//! The transient staging tree.
//!
//! Staging space is scoped to the run: the tree is created under the output
//! directory (so multi-gigabyte weights never land on a tmpfs `/tmp`) and is
//! removed when the `StagingTree` drops — on success, on every error path,
//! and on a cooperative interrupt. This is the one resource-lifetime
//! guarantee the tool makes.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tempfile::TempDir;
use tracing::{debug, info};

use crate::utils::errors::{BackupError, Result};

use super::copier::FileCopier;
use super::BackupSet;

pub struct StagingTree {
    dir: TempDir,
}

impl StagingTree {
    /// Create an empty staging tree inside `parent`.
    pub fn create_in(parent: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(".ollama-backup-")
            .tempdir_in(parent)?;
        debug!("staging tree at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Copy the backup set into the staging tree, mirroring the store layout:
    /// `manifests/<relative path>` and `blobs/<algo>-<hex>`.
    ///
    /// Each unique manifest and blob is copied exactly once; `BackupSet`
    /// uniqueness makes the copy order irrelevant. The cancel flag is checked
    /// between files so an interrupt aborts promptly without leaving the
    /// tree behind (the drop handles removal).
    pub fn stage(
        &self,
        catalog_root: &Path,
        set: &BackupSet,
        copier: &dyn FileCopier,
        cancel: &AtomicBool,
    ) -> Result<()> {
        for relative in &set.manifests {
            if cancel.load(Ordering::SeqCst) {
                return Err(BackupError::Interrupted);
            }
            let src = catalog_root.join("manifests").join(relative);
            let dst = self.root().join("manifests").join(relative);
            if let Some(parent) = dst.parent() {
                fs::create_dir_all(parent)?;
            }
            info!("copying manifest {}", relative.display());
            copier.copy_file(&src, &dst)?;
        }

        let blobs_dir = self.root().join("blobs");
        fs::create_dir_all(&blobs_dir)?;
        let total = set.blobs.len();
        for (i, digest) in set.blobs.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                return Err(BackupError::Interrupted);
            }
            let src = digest.blob_path(catalog_root);
            let dst = blobs_dir.join(digest.blob_file_name());
            info!("copying blob {}/{}: {}", i + 1, total, digest.blob_file_name());
            copier.copy_file(&src, &dst)?;
        }

        Ok(())
    }
}
