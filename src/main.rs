//! Hand-Pose Quiz · game host
//!
//! - Axum HTTP + WebSocket API
//! - One server-side game loop per WebSocket session, fed by the browser's hand detector
//! - Static browser client (./static/index.html)
//!
//! Important env variables:
//!   PORT             : u16 (default 3000)
//!   STATIC_DIR       : directory with the browser client (default "./static")
//!   QUIZ_CONFIG_PATH : path to TOML config (tunables + optional question bank)
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

mod telemetry;
mod domain;
mod config;
mod seeds;
mod tracking;
mod game;
mod render;
mod frame_loop;
mod state;
mod protocol;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;
use crate::telemetry::TARGET_SERVER;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Question bank and tunables are loaded once and shared read-only by every session.
  let state = Arc::new(AppState::new());

  let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "./static".into());
  let app = build_router(state, &static_dir);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: TARGET_SERVER, %addr, %static_dir, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
