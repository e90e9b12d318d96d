//! Backup run orchestration.
//!
//! Drives one run end to end: resolve the selected models into a backup set,
//! stage a deduplicated copy, zip it, and report a summary. The staging tree
//! lives on the stack of `execute`, so it is dropped (and removed) on every
//! exit path — success, any error, or a cooperative interrupt.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::Local;
use tracing::info;

use crate::archive::copier::FileCopier;
use crate::archive::staging::StagingTree;
use crate::archive::{self, zip};
use crate::catalog::ModelEntry;
use crate::config::Config;
use crate::utils::errors::Result;
use crate::utils::fmt::{format_bytes, format_duration};

/// One backup run over an already-selected set of models.
pub struct BackupRun {
    config: Config,
    copier: Box<dyn FileCopier>,
    cancel: Arc<AtomicBool>,
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub models: Vec<String>,
    pub manifest_count: usize,
    pub blob_count: usize,
    pub total_blob_bytes: u64,
    pub archive_path: PathBuf,
    pub duration_secs: u64,
}

impl BackupRun {
    pub fn new(config: Config, copier: Box<dyn FileCopier>, cancel: Arc<AtomicBool>) -> Self {
        Self {
            config,
            copier,
            cancel,
        }
    }

    /// Execute the run: resolve, stage, archive.
    pub fn execute(&self, selected: &[&ModelEntry]) -> Result<RunSummary> {
        let started = std::time::Instant::now();

        let set = archive::build_backup_set(&self.config.catalog_root, selected)?;
        info!(
            "backing up {} model(s): {} manifest(s), {} unique blob(s), {} ({} copier)",
            set.models.len(),
            set.manifests.len(),
            set.blobs.len(),
            format_bytes(set.total_blob_bytes),
            self.copier.name()
        );

        let staging = StagingTree::create_in(&self.config.output_dir)?;
        staging.stage(
            &self.config.catalog_root,
            &set,
            self.copier.as_ref(),
            &self.cancel,
        )?;

        let archive_path = self
            .config
            .output_dir
            .join(zip::archive_file_name(Local::now()));
        info!("writing archive {}", archive_path.display());
        zip::write_archive(staging.root(), &archive_path)?;

        let duration_secs = started.elapsed().as_secs();
        info!(
            "backup complete in {}: {}",
            format_duration(duration_secs),
            archive_path.display()
        );

        Ok(RunSummary {
            models: set.models,
            manifest_count: set.manifests.len(),
            blob_count: set.blobs.len(),
            total_blob_bytes: set.total_blob_bytes,
            archive_path,
            duration_secs,
        })
        // staging drops here; tree removed whichever way we returned
    }
}
