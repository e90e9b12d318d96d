//! Zip output for the staging tree.
//!
//! The archive stores every staged file under its staging-relative path, so
//! the layout inside the zip is exactly `manifests/...` + `blobs/...` and
//! extracting at a catalog root restores store state the daemon can use.
//! Weight blobs routinely exceed 4 GB, so zip64 is always enabled.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::utils::errors::{BackupError, Result};

/// Archive file name for a run started at `now`: `models_<YYYYMMDD>_<HHMMSS>.zip`.
pub fn archive_file_name(now: DateTime<Local>) -> String {
    format!("models_{}.zip", now.format("%Y%m%d_%H%M%S"))
}

/// Compress the whole staging tree into a single zip at `output_path`.
///
/// Any failure surfaces as `ArchiveWrite`, and a partially written archive is
/// removed before returning so a failed run never leaves a truncated zip in
/// place.
pub fn write_archive(staging_root: &Path, output_path: &Path) -> Result<()> {
    match write_archive_inner(staging_root, output_path) {
        Ok(()) => Ok(()),
        Err(source) => {
            let _ = fs::remove_file(output_path);
            Err(BackupError::ArchiveWrite {
                path: output_path.to_path_buf(),
                source,
            })
        }
    }
}

fn write_archive_inner(staging_root: &Path, output_path: &Path) -> io::Result<()> {
    let file = File::create(output_path)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(true);

    for entry in WalkDir::new(staging_root).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(staging_root)
            .unwrap_or(entry.path());
        if relative.as_os_str().is_empty() {
            continue;
        }

        // Zip entry names always use forward slashes.
        let name = relative
            .iter()
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else {
            writer.start_file(name, options)?;
            let mut source = File::open(entry.path())?;
            io::copy(&mut source, &mut writer)?;
        }
    }

    writer.finish()?.flush()?;
    Ok(())
}
