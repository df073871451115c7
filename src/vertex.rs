//! Minimal Vertex AI client for our use-cases.
//!
//! We only call generateContent and request either plain text or a strict
//! JSON object. Calls are instrumented and log model names, latencies, and
//! response sizes (not contents).
//!
//! NOTE: We never log the bearer token and we keep payload truncations short.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::ProviderError;
use crate::provider::CompletionClient;
use crate::util::trunc_for_log;

const DEFAULT_REGION: &str = "us-central1";
const DEFAULT_MODEL: &str = "gemini-1.5-flash-001";
const METADATA_TOKEN_URL: &str =
  "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Temperature used for structured game generation (kept moderate so the
/// model stays on-format while still varying content).
const GAME_TEMPERATURE: f32 = 0.5;

#[derive(Clone)]
pub struct VertexAi {
  client: reqwest::Client,
  project: String,
  region: String,
  model: String,
  /// Static token override; when absent the metadata server is queried.
  static_token: Option<String>,
}

impl VertexAi {
  /// Construct the client if we find GCP_PROJECT; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let project = std::env::var("GCP_PROJECT").ok()?;
    let region = std::env::var("GCP_REGION").unwrap_or_else(|_| DEFAULT_REGION.into());
    let model = std::env::var("VERTEX_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
    let static_token = std::env::var("GCP_ACCESS_TOKEN").ok();

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;

    Some(Self { client, project, region, model, static_token })
  }

  pub fn project(&self) -> &str {
    &self.project
  }

  pub fn region(&self) -> &str {
    &self.region
  }

  pub fn model(&self) -> &str {
    &self.model
  }

  fn endpoint(&self) -> String {
    format!(
      "https://{region}-aiplatform.googleapis.com/v1/projects/{project}/locations/{region}/publishers/google/models/{model}:generateContent",
      region = self.region,
      project = self.project,
      model = self.model,
    )
  }

  /// Resolve a bearer token: env override first, then the GCE/Cloud Run
  /// metadata server (ambient service-account credentials).
  async fn access_token(&self) -> Result<String, ProviderError> {
    if let Some(t) = &self.static_token {
      return Ok(t.clone());
    }

    #[derive(Deserialize)]
    struct TokenResp {
      access_token: String,
    }

    let res = self
      .client
      .get(METADATA_TOKEN_URL)
      .header("Metadata-Flavor", "Google")
      .send()
      .await
      .map_err(|e| ProviderError::Credentials(e.to_string()))?;
    if !res.status().is_success() {
      return Err(ProviderError::Credentials(format!(
        "metadata server HTTP {}",
        res.status()
      )));
    }
    let body: TokenResp = res
      .json()
      .await
      .map_err(|e| ProviderError::Credentials(e.to_string()))?;
    Ok(body.access_token)
  }

  #[instrument(level = "info", skip(self, text, generation_config), fields(model = %self.model, text_len = text.len()))]
  async fn generate(
    &self,
    text: &str,
    generation_config: Option<GenerationConfig>,
  ) -> Result<String, ProviderError> {
    let token = self.access_token().await?;
    let req = GenerateContentRequest {
      contents: vec![Content {
        role: "user".into(),
        parts: vec![Part { text: text.to_string() }],
      }],
      generation_config,
    };

    let start = std::time::Instant::now();
    let res = self
      .client
      .post(self.endpoint())
      .header(USER_AGENT, "edugame-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", token))
      .json(&req)
      .send()
      .await
      .map_err(|e| ProviderError::Transport(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_vertex_error(&body).unwrap_or_else(|| trunc_for_log(&body, 200));
      return Err(ProviderError::Status { status, message });
    }

    let body: GenerateContentResponse =
      res.json().await.map_err(|e| ProviderError::Transport(e.to_string()))?;
    if let Some(usage) = &body.usage_metadata {
      info!(
        prompt_tokens = ?usage.prompt_token_count,
        completion_tokens = ?usage.candidates_token_count,
        total_tokens = ?usage.total_token_count,
        "Vertex usage"
      );
    }

    let reply = body
      .candidates
      .into_iter()
      .next()
      .and_then(|c| c.content)
      .and_then(|c| c.parts.into_iter().next())
      .map(|p| p.text)
      .unwrap_or_default();
    if reply.trim().is_empty() {
      return Err(ProviderError::EmptyCompletion);
    }

    info!(elapsed = ?start.elapsed(), reply_len = reply.len(), "Model response received");
    Ok(reply)
  }
}

#[async_trait::async_trait]
impl CompletionClient for VertexAi {
  async fn complete_json(&self, prompt: &str) -> Result<String, ProviderError> {
    // Ask the provider to constrain output to JSON; the sanitizer still
    // guards against the times it does not comply.
    let cfg = GenerationConfig {
      response_mime_type: Some("application/json".into()),
      temperature: Some(GAME_TEMPERATURE),
    };
    self.generate(prompt, Some(cfg)).await
  }

  async fn complete_text(&self, message: &str) -> Result<String, ProviderError> {
    self.generate(message, None).await
  }
}

// --- Wire DTOs ---

#[derive(Serialize)]
struct GenerateContentRequest {
  contents: Vec<Content>,
  #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
  generation_config: Option<GenerationConfig>,
}
#[derive(Serialize)]
struct Content {
  role: String,
  parts: Vec<Part>,
}
#[derive(Serialize)]
struct Part {
  text: String,
}
#[derive(Serialize)]
struct GenerationConfig {
  #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
  response_mime_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  temperature: Option<f32>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
  #[serde(default, rename = "usageMetadata")]
  usage_metadata: Option<UsageMetadata>,
}
#[derive(Deserialize)]
struct Candidate {
  #[serde(default)]
  content: Option<CandidateContent>,
}
#[derive(Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<RespPart>,
}
#[derive(Deserialize)]
struct RespPart {
  #[serde(default)]
  text: String,
}
#[derive(Deserialize)]
struct UsageMetadata {
  #[serde(default, rename = "promptTokenCount")]
  prompt_token_count: Option<u32>,
  #[serde(default, rename = "candidatesTokenCount")]
  candidates_token_count: Option<u32>,
  #[serde(default, rename = "totalTokenCount")]
  total_token_count: Option<u32>,
}

/// Try to extract a clean error message from a Vertex error body.
fn extract_vertex_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap {
    error: EObj,
  }
  #[derive(Deserialize)]
  struct EObj {
    message: String,
  }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn error_message_is_extracted_from_error_body() {
    let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
    assert_eq!(extract_vertex_error(body), Some("Quota exceeded".into()));
    assert_eq!(extract_vertex_error("plain text"), None);
  }

  #[test]
  fn generation_config_serializes_with_camel_case_names() {
    let cfg = GenerationConfig {
      response_mime_type: Some("application/json".into()),
      temperature: Some(0.5),
    };
    let v = serde_json::to_value(&cfg).unwrap();
    assert_eq!(v["responseMimeType"], "application/json");
    assert_eq!(v["temperature"], 0.5);
  }
}
