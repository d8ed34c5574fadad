use anyhow::{Context, Result};
use colored::*;

use super::{open_pool, output_path};
use crate::cli::ExportArgs;
use crate::config::Config;
use crate::listone;

pub async fn handle_export_command(args: ExportArgs, config: Config) -> Result<()> {
    let pool = open_pool(&config).await?;
    let (workbook, listed) = listone::export_listone(&pool, &config.listone).await?;

    let output = output_path(args.output, &config);
    tokio::fs::write(&output, &workbook)
        .await
        .with_context(|| format!("Failed to write listone: {}", output.display()))?;

    println!(
        "Wrote {} available players to {}",
        listed,
        output.display().to_string().cyan()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.url = Some(format!(
            "sqlite://{}",
            dir.path().join("league.db").display()
        ));
        let output = dir.path().join("listone.xlsx");

        handle_export_command(
            ExportArgs {
                output: Some(output.clone()),
            },
            config,
        )
        .await
        .unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
