//! Configuration loading
//!
//! Precedence, lowest first: built-in defaults, `polipulse.toml` (or the
//! file given with `--config`), `POLIPULSE_*` environment variables. A
//! `.env` file is loaded into the environment before this runs. Command
//! flags are applied on top by each command.

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use polipulse_core::ImportConfig;

pub fn load(explicit: Option<&Path>) -> Result<ImportConfig> {
    let file = match explicit {
        Some(path) => File::from(path).required(true),
        None => File::with_name("polipulse").required(false),
    };

    let settings = Config::builder()
        .add_source(file)
        .add_source(Environment::with_prefix("POLIPULSE").try_parsing(true))
        .build()
        .context("failed to read configuration")?;

    let config: ImportConfig = settings
        .try_deserialize()
        .context("invalid configuration")?;
    config.validate()?;
    Ok(config)
}

/// Apply per-command flag overrides and re-check ranges
pub fn with_overrides(
    mut config: ImportConfig,
    db: Option<&Path>,
    workers: Option<usize>,
) -> Result<ImportConfig> {
    if let Some(db) = db {
        config.database_path = db.to_path_buf();
    }
    if let Some(workers) = workers {
        config.worker_count = workers;
    }
    config.validate()?;
    Ok(config)
}
