//! Shared handler state.

use std::sync::Arc;
use std::time::Instant;

use dossier_gate::{ApiKeyGate, RateLimiter, ResponseCache};
use dossier_pipeline::Orchestrator;
use dossier_settings::DossierSettings;

/// Everything the handlers need, cloned per request.
#[derive(Clone)]
pub struct AppState {
    /// API-key gate with usage quotas.
    pub gate: Arc<ApiKeyGate>,
    /// Per-endpoint fixed-window limiter.
    pub limiter: Arc<RateLimiter>,
    /// Research response cache.
    pub cache: Arc<ResponseCache>,
    /// The three pipeline agents.
    pub orchestrator: Arc<Orchestrator>,
    /// Settings snapshot taken at startup.
    pub settings: Arc<DossierSettings>,
    /// When the server started.
    pub start_time: Instant,
}

impl AppState {
    /// The request header that carries the API key.
    #[must_use]
    pub fn api_key_header(&self) -> &str {
        &self.settings.auth.header_name
    }
}
