// SPDX-FileCopyrightText: 2025-2026 Nils Brandt <nils@cardsync.dev>
//
// SPDX-License-Identifier: Apache-2.0

//! `cardsync` binary: runs one reconciliation pass per configured source.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use cardsync_core::{LocalDb, SourceConfig, SyncWorker};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cardsync")]
#[command(about = "One-way CardDAV contact sync into a local store", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Only sync the source with this id.
    #[arg(long)]
    source: Option<String>,
}

/// Application configuration.
#[derive(Debug, serde::Deserialize)]
struct Config {
    /// Path to the SQLite state database. In-memory when absent.
    #[serde(default)]
    state_db: Option<PathBuf>,

    /// Account reference stored on every book and contact.
    #[serde(default = "default_account_id")]
    account_id: String,

    /// The external sources to reconcile.
    sources: Vec<SourceConfig>,
}

fn default_account_id() -> String {
    "local".to_string()
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let raw = tokio::fs::read_to_string(&cli.config)
        .await
        .map_err(|e| format!("Failed to read config {}: {e}", cli.config.display()))?;
    let config: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {e}"))?;

    let mut sources = config.sources;
    if let Some(only) = &cli.source {
        sources.retain(|s| &s.id == only);
        if sources.is_empty() {
            return Err(format!("No source with id {only:?} in config").into());
        }
    }

    let db = LocalDb::open(config.state_db.as_deref()).await?;

    let mut failed = false;
    for source in sources {
        let worker = SyncWorker::new(db.clone(), source, config.account_id.clone())?;
        let outcome = worker.run().await;

        if outcome.success {
            println!(
                "{} {} ({} contacts)",
                "synced".green().bold(),
                outcome.source_name,
                outcome.contact_count
            );
        } else {
            failed = true;
            println!(
                "{} {}: {}",
                "failed".red().bold(),
                outcome.source_name,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    db.close().await;

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
