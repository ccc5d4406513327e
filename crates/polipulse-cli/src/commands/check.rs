//! Check command: parse and validate without touching the store
//!
//! Usage: polipulse check <FILE>

use anyhow::{Context, Result};
use clap::Args;
use polipulse_core::resolution::DuplicateSummary;
use polipulse_engine::ImportSession;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// CSV file to check
    pub file: PathBuf,
}

pub fn execute(args: CheckArgs) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let mut session = ImportSession::default();
    session.select_file(args.file.display().to_string(), bytes)?;
    let row_count = session.parse()?;
    let verdicts = session.preview()?.to_vec();

    for (row, verdict) in session.rows().iter().zip(&verdicts) {
        match verdict.reason() {
            None => println!("row {:>4}  {:<16} ok", row.origin_index, row.key()),
            Some(reason) => println!(
                "row {:>4}  {:<16} INVALID: {}",
                row.origin_index,
                row.key(),
                reason
            ),
        }
    }

    let in_file = DuplicateSummary {
        existing: Vec::new(),
        incoming: session.valid_rows(),
    };
    for conflict in in_file.intra_file_conflicts() {
        println!(
            "warning: policy number {} appears on rows {:?}; only the first insert can succeed",
            conflict.policy_no, conflict.origin_indices
        );
    }

    let invalid = session.rejections().len();
    println!(
        "{} rows, {} valid, {} invalid",
        row_count,
        row_count - invalid,
        invalid
    );
    Ok(())
}
