//! Application state: license key set, service settings, and the shared
//! provider handle.
//!
//! The provider handle is built once at startup and reused, never mutated.
//! If GCP_PROJECT is missing the process still serves; generation requests
//! then answer with a fixed "service unavailable" error instead of crashing.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::{load_service_config_from_env, MalformedOutputPolicy, ServiceConfig};
use crate::licenses::LicenseKeySet;
use crate::provider::CompletionClient;
use crate::vertex::VertexAi;

#[derive(Clone)]
pub struct AppState {
    pub licenses: LicenseKeySet,
    pub provider: Option<Arc<dyn CompletionClient>>,
    pub malformed_output: MalformedOutputPolicy,
    pub chat_apology: String,
}

impl AppState {
    /// Build state from env: load config, build the license set, init Vertex.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let settings = load_service_config_from_env().unwrap_or_default();

        let provider: Option<Arc<dyn CompletionClient>> = match VertexAi::from_env() {
            Some(v) => {
                info!(
                    target: "edugame_backend",
                    project = %v.project(),
                    region = %v.region(),
                    model = %v.model(),
                    "Vertex AI enabled."
                );
                Some(Arc::new(v))
            }
            None => {
                warn!(
                    target: "edugame_backend",
                    "Vertex AI disabled (no GCP_PROJECT). Generation requests will be refused."
                );
                None
            }
        };

        Self::with_provider(settings, provider)
    }

    /// Assemble state from explicit parts. Tests inject a mock provider here.
    pub fn with_provider(
        settings: ServiceConfig,
        provider: Option<Arc<dyn CompletionClient>>,
    ) -> Self {
        info!(
            target: "edugame_backend",
            license_keys = settings.license_keys.len(),
            malformed_output = ?settings.malformed_output,
            "Service settings loaded"
        );
        Self {
            licenses: LicenseKeySet::new(settings.license_keys),
            provider,
            malformed_output: settings.malformed_output,
            chat_apology: settings.chat_apology,
        }
    }

    pub fn model_ready(&self) -> bool {
        self.provider.is_some()
    }
}
