//! Ollama Backup - Main entry point
//!
//! Backs up selected Ollama models into a single timestamped zip archive.

use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use ollama_backup::archive::copier;
use ollama_backup::backup::BackupRun;
use ollama_backup::utils::fmt::format_bytes;
use ollama_backup::{catalog, select, utils, BackupError, Config};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the Ollama model store (overrides OLLAMA_MODELS and the default locations)
    #[arg(short = 'C', long, value_name = "DIR")]
    catalog_root: Option<PathBuf>,

    /// Directory the archive is written to (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Select models without prompting: 1-based numbers ("1 3") or "all"
    #[arg(short, long, value_name = "SELECTION")]
    models: Option<String>,

    /// Back up every installed model
    #[arg(long, conflicts_with = "models")]
    all: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    utils::logger::init(args.log_level.as_deref().unwrap_or("info"))?;

    tracing::info!("Starting ollama-backup v{}", env!("CARGO_PKG_VERSION"));

    match run(args) {
        Ok(()) => Ok(()),
        Err(BackupError::Interrupted) => {
            eprintln!("interrupted; staging cleaned up, no archive written");
            process::exit(130);
        }
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn run(args: Args) -> ollama_backup::Result<()> {
    let config = Config::discover(args.catalog_root, args.output_dir)?;
    tracing::info!("model catalog: {}", config.catalog_root.display());

    // First interrupt requests cooperative cancellation (the staging tree is
    // dropped before exit); a second one gives up immediately.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            if cancel.swap(true, Ordering::SeqCst) {
                process::exit(130);
            }
            tracing::warn!("interrupt received, finishing current file then cleaning up...");
        })
        .map_err(std::io::Error::other)?;
    }

    let entries = catalog::enumerate_models(&config.catalog_root)?;

    let selection = if args.all {
        select::Selection::All
    } else if let Some(models) = &args.models {
        select::Selection::parse(models)?
    } else {
        select::prompt(&entries)?
    };
    let selected = selection.apply(&entries)?;

    let run = BackupRun::new(config, copier::detect_copier(), cancel);
    let summary = run.execute(&selected)?;

    println!(
        "Backed up {} model(s) ({} blobs, {}) to {}",
        summary.models.len(),
        summary.blob_count,
        format_bytes(summary.total_blob_bytes),
        summary.archive_path.display()
    );
    Ok(())
}
