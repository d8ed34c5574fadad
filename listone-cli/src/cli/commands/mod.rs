//! Command handlers

pub mod export;
pub mod serve;
pub mod sync;
pub mod team;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::PathBuf;

use super::Commands;
use crate::config::{Config, repository};
use crate::listone;

pub async fn run(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Serve(args) => serve::handle_serve_command(args, config).await,
        Commands::Sync(args) => sync::handle_sync_command(args, config).await,
        Commands::Export(args) => export::handle_export_command(args, config).await,
        Commands::Team { command } => team::handle_team_command(command, config).await,
    }
}

async fn open_pool(config: &Config) -> Result<SqlitePool> {
    let url = config.database_url()?;
    repository::connect(&url).await
}

/// `--output` if given, else the configured download name stamped with today's date
fn output_path(output: Option<PathBuf>, config: &Config) -> PathBuf {
    output.unwrap_or_else(|| {
        let today = chrono::Local::now().date_naive();
        PathBuf::from(listone::dated_file_name(&config.listone.download_name, today))
    })
}
