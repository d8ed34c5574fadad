//! Command-line interface

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "listone")]
#[command(about = "Fantasy football listone: import quotations, reconcile players, export availability")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database URL (overrides the configuration)
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the admin web server
    Serve(ServeArgs),
    /// Import a quotations file and write the regenerated listone
    Sync(SyncArgs),
    /// Write the availability listone from the current database
    Export(ExportArgs),
    /// Manage fantasy teams and rosters
    Team {
        #[command(subcommand)]
        command: TeamCommands,
    },
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides the configuration)
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Args)]
pub struct SyncArgs {
    /// Quotations workbook (.xlsx)
    pub file: PathBuf,

    /// Where to write the generated listone
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Where to write the generated listone
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum TeamCommands {
    /// Create a fantasy team
    Add {
        name: String,
    },
    /// List teams with their roster size
    List,
    /// Give a copy of a player to a team
    Assign {
        team: String,
        player_id: i64,
    },
    /// Remove a player from a team's roster
    Release {
        team: String,
        player_id: i64,
    },
}
