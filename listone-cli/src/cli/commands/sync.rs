use anyhow::{Context, Result};
use colored::*;

use super::{open_pool, output_path};
use crate::cli::SyncArgs;
use crate::config::Config;
use crate::listone::{self, excel::SkipReason};

pub async fn handle_sync_command(args: SyncArgs, config: Config) -> Result<()> {
    if !args.file.exists() {
        anyhow::bail!("Listone file does not exist: {}", args.file.display());
    }

    let upload = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read listone file: {}", args.file.display()))?;

    let pool = open_pool(&config).await?;
    let outcome = listone::run_sync(&pool, upload, &config.listone).await?;

    let output = output_path(args.output, &config);
    tokio::fs::write(&output, &outcome.workbook)
        .await
        .with_context(|| format!("Failed to write listone: {}", output.display()))?;

    let report = &outcome.report;
    println!("{}", "Listone synchronized".green().bold());
    println!("  created:   {}", report.created.to_string().green());
    println!("  updated:   {}", report.updated.to_string().yellow());
    println!("  unchanged: {}", report.unchanged.to_string().dimmed());
    println!("  deleted:   {}", report.deleted.to_string().red());
    if report.deleted > 0 {
        println!(
            "  released {} roster slots, removed {} trade references",
            report.released_roster_slots, report.removed_trade_refs
        );
    }

    if !outcome.skipped_rows.is_empty() {
        println!("{}", format!("{} rows skipped:", outcome.skipped_rows.len()).yellow());
        for skipped in &outcome.skipped_rows {
            match &skipped.reason {
                SkipReason::Incomplete => {
                    println!("  row {}: missing id, role or surname", skipped.row)
                }
                SkipReason::InvalidId(id) => println!("  row {}: invalid id '{}'", skipped.row, id),
            }
        }
    }
    if !outcome.duplicate_ids.is_empty() {
        println!(
            "{} {:?}",
            "Duplicate ids (last row kept):".yellow(),
            outcome.duplicate_ids
        );
    }

    println!(
        "Wrote {} available players to {}",
        outcome.listed,
        output.display().to_string().cyan()
    );

    Ok(())
}
