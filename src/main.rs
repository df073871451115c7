//! Edugame · Lesson Game Generation Backend
//!
//! - Axum HTTP API (health, game generation, chat passthrough)
//! - Vertex AI integration (via environment variables)
//!
//! Important env variables:
//!   PORT          : u16 (default 8080)
//!   GCP_PROJECT      : enables the Vertex AI client if present
//!   GCP_REGION      : default "us-central1"
//!   VERTEX_MODEL     : default "gemini-1.5-flash-001"
//!   GCP_ACCESS_TOKEN   : static bearer token (otherwise metadata server)
//!   SERVICE_CONFIG_PATH  : path to TOML config (license keys + policies)
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod config;
mod licenses;
mod protocol;
mod prompt;
mod sanitize;
mod provider;
mod vertex;
mod state;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (license set, settings, Vertex client).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 8080.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "edugame_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
