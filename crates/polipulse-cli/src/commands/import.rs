//! Import command
//!
//! Usage: polipulse import <FILE> [--policy <POLICY>] [--yes] [--db <PATH>] [--workers <N>]
//!
//! When rows match stored policies and no `--policy` is given, the duplicate
//! summary is printed and nothing is written.

use anyhow::{Context, Result};
use clap::Args;
use polipulse_core::resolution::build_tasks;
use polipulse_core::{ImportConfig, RecordStore, ResolutionPolicy};
use polipulse_engine::{ImportSession, ImportStage, PolicyList, ProgressObserver};
use polipulse_store::SqliteRecordStore;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::settings;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV file to import
    pub file: PathBuf,

    /// How to treat rows whose policy number is already stored:
    /// insert-only, update-existing or skip-duplicates
    #[arg(long)]
    pub policy: Option<ResolutionPolicy>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Database path (overrides configuration)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Concurrent store writes (1-32)
    #[arg(long)]
    pub workers: Option<usize>,
}

/// Prints a single updating progress line to stderr
struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn on_progress(&self, percent: u8, completed: usize, total: usize) {
        eprint!("\rImporting... {:>3}% ({}/{})", percent, completed, total);
        if completed == total {
            eprintln!();
        }
    }
}

pub async fn execute(args: ImportArgs, config: ImportConfig) -> Result<()> {
    let config = settings::with_overrides(config, args.db.as_deref(), args.workers)?;
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let store = SqliteRecordStore::open(&config.database_path)?;
    tracing::debug!(
        db = %config.database_path.display(),
        worker_count = config.worker_count,
        "opened policy store"
    );
    let mut list = PolicyList::from_records(store.select_all().await?);

    let mut session = ImportSession::default().with_worker_count(config.worker_count);
    session.select_file(args.file.display().to_string(), bytes)?;
    let row_count = session.parse()?;
    session.preview()?;

    let rejections = session.rejections();
    for (origin_index, reason) in &rejections {
        println!("row {:>4}  skipped: {}", origin_index, reason);
    }
    println!(
        "{} rows parsed, {} valid, {} invalid",
        row_count,
        row_count - rejections.len(),
        rejections.len()
    );

    let summary = session.prepare(&store).await?.clone();
    println!(
        "{} new, {} already stored",
        summary.incoming.len(),
        summary.existing.len()
    );
    for conflict in summary.intra_file_conflicts() {
        println!(
            "warning: policy number {} appears on rows {:?}",
            conflict.policy_no, conflict.origin_indices
        );
    }

    match (session.stage(), args.policy) {
        (ImportStage::AwaitingResolution, None) => {
            for row in &summary.existing {
                println!("  existing: row {:>4}  {}", row.origin_index, row.key());
            }
            println!(
                "Duplicates found. Re-run with --policy ({}) to continue; nothing was written.",
                ResolutionPolicy::ALL.map(|p| p.as_str()).join(" | ")
            );
            return Ok(());
        }
        (_, Some(policy)) => session.choose_policy(policy)?,
        (_, None) => {}
    }

    let task_count = build_tasks(&summary, session.policy()).len();
    if task_count > 0 && !args.yes && !confirm(task_count, session.policy())? {
        println!("Import cancelled");
        return Ok(());
    }

    let outcome = session.execute(&store, &ConsoleProgress, &mut list).await?;

    for failure in &outcome.failures {
        println!("row {:>4}  failed: {}", failure.origin_index, failure.reason);
    }
    println!("{}", outcome.summary());
    println!("{} policies in store", list.len());
    Ok(())
}

fn confirm(task_count: usize, policy: ResolutionPolicy) -> Result<bool> {
    print!("Apply {} changes ({})? [y/N] ", task_count, policy);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
