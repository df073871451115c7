//! Request error taxonomy, mapped to HTTP exactly once.
//!
//! Every failure a handler can hit becomes one of these variants; the
//! `IntoResponse` impl is the single place status codes are chosen. Bodies
//! are always well-formed JSON, never a bare fault string.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use thiserror::Error;

use crate::protocol::ErrorBody;

/// Failures reported by the completion provider adapter.
#[derive(Debug, Error)]
pub enum ProviderError {
  #[error("provider transport error: {0}")]
  Transport(String),
  #[error("provider HTTP {status}: {message}")]
  Status { status: u16, message: String },
  #[error("provider returned no completion text")]
  EmptyCompletion,
  #[error("no access token available: {0}")]
  Credentials(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
  /// License key not in the authorized set. No provider call was made.
  #[error("invalid or expired license key")]
  Unauthorized,
  /// Provider client never initialized (missing GCP_PROJECT at startup).
  #[error("AI service unavailable (provider not configured)")]
  ProviderUnavailable,
  /// The single completion attempt failed.
  #[error("AI generation failed: {0}")]
  Provider(#[from] ProviderError),
  /// Completion text could not be reduced to parseable JSON.
  #[error("AI returned malformed data: {0}")]
  MalformedOutput(String),
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::ProviderUnavailable
      | ApiError::Provider(_)
      | ApiError::MalformedOutput(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = ErrorBody { error: self.to_string() };
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unauthorized_maps_to_401() {
    assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
  }

  #[test]
  fn provider_failures_map_to_500() {
    assert_eq!(ApiError::ProviderUnavailable.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let e = ApiError::Provider(ProviderError::Transport("timeout".into()));
    assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
      ApiError::MalformedOutput("x".into()).status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }
}
