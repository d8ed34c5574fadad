use anyhow::{Context, Result};
use std::net::SocketAddr;

use super::open_pool;
use crate::cli::ServeArgs;
use crate::config::Config;
use crate::config::repository::players;
use crate::server::{self, AppState};

pub async fn handle_serve_command(args: ServeArgs, config: Config) -> Result<()> {
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", bind))?;

    let pool = open_pool(&config).await?;
    log::info!("Database holds {} players", players::count_players(&pool).await?);

    let state = AppState {
        pool,
        settings: config.listone.clone(),
    };

    server::serve(state, addr, config.server.max_upload_bytes).await
}
