//! PoliPulse CLI
//!
//! Command-line surface for the bulk policy import engine

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod settings;

#[derive(Debug, Parser)]
#[command(name = "polipulse")]
#[command(about = "PoliPulse - bulk CSV import for insurance policies", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./polipulse.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write the CSV import template
    Template(commands::template::TemplateArgs),
    /// Parse and validate a CSV file without touching the store
    Check(commands::check::CheckArgs),
    /// Import a CSV file into the store
    Import(commands::import::ImportArgs),
    /// List stored policies
    List(commands::list::ListArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = match settings::load(cli.config.as_deref()) {
        Ok(config) => {
            polipulse_core::logging_facility::init(config.profile().unwrap_or_default());
            match cli.command {
                Commands::Template(args) => commands::template::execute(args),
                Commands::Check(args) => commands::check::execute(args),
                Commands::Import(args) => commands::import::execute(args, config).await,
                Commands::List(args) => commands::list::execute(args, config).await,
            }
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
