//! Template command
//!
//! Usage: polipulse template [--out <PATH>]

use anyhow::{Context, Result};
use clap::Args;
use polipulse_core::ingest::{template_csv, TEMPLATE_FILE_NAME};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct TemplateArgs {
    /// Output path; `-` writes to stdout
    #[arg(long, default_value = TEMPLATE_FILE_NAME)]
    pub out: PathBuf,
}

pub fn execute(args: TemplateArgs) -> Result<()> {
    let body = template_csv();
    if args.out.as_os_str() == "-" {
        print!("{}", body);
        return Ok(());
    }

    std::fs::write(&args.out, body)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    println!("✓ Wrote template to {}", args.out.display());
    Ok(())
}
