//! HTTP surface for the listone admin page
//!
//! - `GET  /admin/manage/listone`      upload form
//! - `POST /api/admin/sync-listone`    multipart upload, replies with the new listone
//! - `GET  /api/admin/listone`         current listone without importing
//! - `GET  /health`

mod handlers;
mod rejection;

use std::convert::Infallible;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use warp::{Filter, Reply};

use crate::config::ListoneSettings;

const UPLOAD_PAGE: &str = include_str!("../../assets/listone.html");

/// Shared state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub settings: ListoneSettings,
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

pub fn routes(
    state: AppState,
    max_upload_bytes: u64,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let sync = warp::path!("api" / "admin" / "sync-listone")
        .and(warp::post())
        .and(warp::multipart::form().max_length(max_upload_bytes))
        .and(with_state(state.clone()))
        .and_then(handlers::sync_listone);

    let export = warp::path!("api" / "admin" / "listone")
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::export_listone);

    let page = warp::path!("admin" / "manage" / "listone")
        .and(warp::get())
        .map(|| warp::reply::html(UPLOAD_PAGE));

    let health = warp::path!("health").and(warp::get()).map(|| "ok");

    sync.or(export)
        .or(page)
        .or(health)
        .recover(rejection::handle_rejection)
        .with(warp::log("listone::http"))
}

/// Serve until Ctrl-C
pub async fn serve(state: AppState, addr: SocketAddr, max_upload_bytes: u64) -> Result<()> {
    let (bound, server) = warp::serve(routes(state, max_upload_bytes))
        .try_bind_with_graceful_shutdown(addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .with_context(|| format!("Failed to bind {}", addr))?;

    log::info!("Listone admin listening on http://{}/admin/manage/listone", bound);
    server.await;
    log::info!("Server stopped");

    Ok(())
}
