//! `DossierServer` — builds the admission stack and serves the router.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use dossier_gate::{ApiKeyGate, Credential, RateLimiter, ResponseCache, StaticCredentialStore, UsageTracker};
use dossier_pipeline::Orchestrator;
use dossier_settings::DossierSettings;

use crate::routes;
use crate::state::AppState;

/// The HTTP server: settings plus the wired pipeline.
pub struct DossierServer {
    settings: Arc<DossierSettings>,
    state: AppState,
}

impl DossierServer {
    /// Build the admission stack from settings around an orchestrator.
    #[must_use]
    pub fn new(settings: DossierSettings, orchestrator: Arc<Orchestrator>) -> Self {
        let credentials = settings
            .auth
            .keys
            .iter()
            .map(|k| Credential {
                key: k.key.clone(),
                name: k.name.clone(),
                usage_limit: k.usage_limit,
            })
            .collect();
        let gate = ApiKeyGate::new(
            Arc::new(StaticCredentialStore::new(credentials)),
            Arc::new(UsageTracker::new()),
        );

        let mut limiter = RateLimiter::new(Duration::from_secs(settings.rate_limit.window_secs));
        for endpoint in ["research", "summarize", "verify", "complete", "health"] {
            if let Some(ceiling) = settings.rate_limit.ceiling_for(endpoint) {
                limiter = limiter.with_ceiling(endpoint, ceiling);
            }
        }

        let cache = ResponseCache::new(
            Duration::from_secs(settings.cache.ttl_secs),
            settings.cache.max_entries,
        );

        let settings = Arc::new(settings);
        let state = AppState {
            gate: Arc::new(gate),
            limiter: Arc::new(limiter),
            cache: Arc::new(cache),
            orchestrator,
            settings: settings.clone(),
            start_time: Instant::now(),
        };
        Self { settings, state }
    }

    /// The axum router with tracing and open CORS applied.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// The shared handler state (for tests).
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Bind and serve until ctrl-c.
    pub async fn listen(&self) -> std::io::Result<()> {
        let addr = format!(
            "{}:{}",
            self.settings.server.host, self.settings.server.port
        );
        let listener = TcpListener::bind(&addr).await?;
        info!(addr = %listener.local_addr()?, "listening");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
