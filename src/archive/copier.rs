//! File copier seam: rsync for progress display, plain copy as fallback.
//!
//! Large model weights take a while to copy, so when rsync is on the PATH the
//! copy is delegated to it purely for its progress output. Both copiers must
//! produce byte-identical destination files; the only difference a missing
//! rsync makes is the absence of a progress indicator.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::utils::errors::Result;

pub trait FileCopier {
    fn copy_file(&self, src: &Path, dst: &Path) -> Result<()>;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Fallback copier using the standard library. Non-interactive, no progress.
pub struct PlainCopier;

impl FileCopier for PlainCopier {
    fn copy_file(&self, src: &Path, dst: &Path) -> Result<()> {
        std::fs::copy(src, dst)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}

/// Copier that shells out to rsync so the user sees per-file progress.
pub struct RsyncCopier;

impl FileCopier for RsyncCopier {
    fn copy_file(&self, src: &Path, dst: &Path) -> Result<()> {
        let status = Command::new("rsync")
            .arg("-ah")
            .arg("--progress")
            .arg(src)
            .arg(dst)
            .status()?;
        if !status.success() {
            // Also the path taken when a SIGINT reaches the rsync child.
            return Err(std::io::Error::other(format!(
                "rsync {} -> {} exited with {status}",
                src.display(),
                dst.display()
            ))
            .into());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "rsync"
    }
}

/// Probe for rsync once at startup and pick the copier for the whole run.
pub fn detect_copier() -> Box<dyn FileCopier> {
    let available = Command::new("rsync")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false);

    if available {
        debug!("rsync found, copying with per-file progress");
        Box::new(RsyncCopier)
    } else {
        info!("rsync not found, copying without progress display");
        Box::new(PlainCopier)
    }
}
