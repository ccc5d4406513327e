//! List command
//!
//! Usage: polipulse list [--db <PATH>] [--json]

use anyhow::Result;
use clap::Args;
use polipulse_core::{ImportConfig, RecordStore};
use polipulse_store::SqliteRecordStore;
use std::path::PathBuf;

use crate::settings;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Database path (overrides configuration)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: ListArgs, config: ImportConfig) -> Result<()> {
    let config = settings::with_overrides(config, args.db.as_deref(), None)?;
    let store = SqliteRecordStore::open(&config.database_path)?;
    let records = store.select_all().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for record in &records {
        let p = &record.policy;
        println!(
            "{:<16} {:<24} {:<20} {:<12} {:>12.2} {}",
            p.policy_no, p.client_name, p.company_name, p.policy_type, p.premium, p.renewal_date
        );
    }
    println!("{} policies", records.len());
    Ok(())
}
