mod cli;
mod config;
mod listone;
mod server;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use config::Config;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.database {
        config.database.url = Some(url);
    }

    cli::commands::run(cli.command, config).await
}
