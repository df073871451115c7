//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; status mapping happens in `ApiError`.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use tracing::instrument;

use crate::error::ApiError;
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let ready = state.model_ready();
  Json(HealthOut {
    status: "ok",
    model_ready: ready,
    message: if ready {
      "Backend running, AI model ready.".into()
    } else {
      "Backend running, AI model not configured.".into()
    },
  })
}

#[instrument(level = "info", skip(state, body), fields(game_type = %body.game_type))]
pub async fn http_generate_game(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GameConfig>,
) -> Result<Json<serde_json::Value>, ApiError> {
  let game = logic::generate_game(&state, body).await?;
  Ok(Json(game))
}

#[instrument(level = "info", skip(state, body), fields(message_len = body.message.len()))]
pub async fn http_chat(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ChatIn>,
) -> Result<Json<ChatOut>, ApiError> {
  let reply = logic::chat(&state, body).await?;
  Ok(Json(reply))
}
