//! End-to-end listone sync: parse, reconcile, render
//!
//! Spreadsheet parsing and rendering are CPU-bound and run on the blocking
//! thread pool; database work stays on the async runtime.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::config::ListoneSettings;
use crate::config::repository::players;
use crate::listone::excel::SkippedRow;
use crate::listone::{SyncReport, build_entries, parse_listone, render_listone, sync_listone};

/// Result of a full sync
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub report: SyncReport,
    /// Generated listone workbook
    pub workbook: Vec<u8>,
    /// Players written to the generated listone
    pub listed: usize,
    pub skipped_rows: Vec<SkippedRow>,
    pub duplicate_ids: Vec<i64>,
}

/// Import an uploaded workbook and return the regenerated listone
pub async fn run_sync(
    pool: &SqlitePool,
    upload: Vec<u8>,
    settings: &ListoneSettings,
) -> Result<SyncOutcome> {
    log::info!("Starting listone sync ({} bytes uploaded)", upload.len());

    let parse_settings = settings.clone();
    let parsed = tokio::task::spawn_blocking(move || parse_listone(&upload, &parse_settings))
        .await
        .context("Listone parser task failed")??;

    let report = sync_listone(pool, &parsed.rows).await?;
    let (workbook, listed) = export_listone(pool, settings).await?;

    Ok(SyncOutcome {
        report,
        workbook,
        listed,
        skipped_rows: parsed.skipped,
        duplicate_ids: parsed.duplicate_ids,
    })
}

/// Render the availability listone from the current database
///
/// Returns the workbook and the number of players it lists.
pub async fn export_listone(pool: &SqlitePool, settings: &ListoneSettings) -> Result<(Vec<u8>, usize)> {
    let players = players::list_availability(pool).await?;
    let entries = build_entries(players, settings.max_copies);
    let listed = entries.len();

    let sheet_name = settings.sheet_name.clone();
    let workbook = tokio::task::spawn_blocking(move || render_listone(&entries, &sheet_name))
        .await
        .context("Listone writer task failed")??;

    Ok((workbook, listed))
}
