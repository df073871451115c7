//! Completion provider boundary.
//!
//! The orchestrator only ever sees this trait, so the hosted model can be
//! swapped for a mock in tests. One completion attempt per call; retries, if
//! any, belong to the adapter.

use async_trait::async_trait;

use crate::error::ProviderError;

#[async_trait]
pub trait CompletionClient: Send + Sync {
  /// Completion that asks the provider for a strict JSON object.
  /// Used by the game-generation flow.
  async fn complete_json(&self, prompt: &str) -> Result<String, ProviderError>;

  /// Plain free-text completion. Used by the chat passthrough.
  async fn complete_text(&self, message: &str) -> Result<String, ProviderError>;
}
