//! Core behaviors behind the HTTP handlers.
//!
//! Each request walks one pass, terminal on first exit:
//!   license check → provider check → prompt → single completion attempt →
//!   sanitize → parsed JSON (or policy-driven placeholder).
//! No retries at this layer.

use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::config::MalformedOutputPolicy;
use crate::error::ApiError;
use crate::prompt::build_game_prompt;
use crate::protocol::{ChatIn, ChatOut, GameConfig};
use crate::sanitize::extract_game_json;
use crate::state::AppState;
use crate::util::trunc_for_log;

/// Fixed-shape payload used when the deployment degrades malformed model
/// output instead of failing the request. Always the three expected keys.
fn placeholder_game() -> serde_json::Value {
  json!({
    "title": "Generation failed",
    "description": "The AI returned data we could not read. Please try generating the game again.",
    "questions": []
  })
}

#[instrument(level = "info", skip(state, cfg), fields(subject = %cfg.subject, game_type = %cfg.game_type, activity_type = %cfg.activity_type))]
pub async fn generate_game(state: &AppState, cfg: GameConfig) -> Result<serde_json::Value, ApiError> {
  // License gate runs before anything that could spend quota.
  if !state.licenses.is_authorized(&cfg.license_key) {
    warn!(target: "generate", "Rejected request with invalid license key");
    return Err(ApiError::Unauthorized);
  }

  let provider = state.provider.as_ref().ok_or(ApiError::ProviderUnavailable)?;

  let prompt = build_game_prompt(&cfg);
  let raw = provider.complete_json(&prompt).await.map_err(|e| {
    error!(target: "generate", error = %e, "Completion call failed");
    ApiError::from(e)
  })?;
  info!(target: "generate", raw_preview = %trunc_for_log(&raw, 100), "Model completion received");

  match extract_game_json(&raw) {
    Ok(game) => Ok(game),
    Err(e) => {
      error!(target: "generate", error = %e, raw = %trunc_for_log(&raw, 400), "Completion did not sanitize to JSON");
      match state.malformed_output {
        MalformedOutputPolicy::Error => Err(ApiError::MalformedOutput(e.to_string())),
        MalformedOutputPolicy::Placeholder => Ok(placeholder_game()),
      }
    }
  }
}

/// Free-text passthrough. Degrades softer than game generation: provider
/// absence or failure becomes the fixed apology reply, never a 5xx.
#[instrument(level = "info", skip(state, req), fields(message_len = req.message.len()))]
pub async fn chat(state: &AppState, req: ChatIn) -> Result<ChatOut, ApiError> {
  if !state.licenses.is_authorized(&req.license_key) {
    warn!(target: "edugame_backend", "Rejected chat with invalid license key");
    return Err(ApiError::Unauthorized);
  }

  let Some(provider) = state.provider.as_ref() else {
    warn!(target: "edugame_backend", "Chat requested with no provider; sending apology reply");
    return Ok(ChatOut { reply: state.chat_apology.clone() });
  };

  match provider.complete_text(&req.message).await {
    Ok(reply) => Ok(ChatOut { reply }),
    Err(e) => {
      error!(target: "edugame_backend", error = %e, "Chat completion failed; sending apology reply");
      Ok(ChatOut { reply: state.chat_apology.clone() })
    }
  }
}
