//! Route table and request handlers.
//!
//! Admission order for protected endpoints is fixed: API-key gate first,
//! then the per-endpoint rate limiter, then (for `/research`) the cache,
//! then the actual work. A cache hit therefore still consumes quota and a
//! rate-limit slot.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;
use axum::routing::{delete, get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use dossier_core::summary::SummaryVariant;
use dossier_gate::AuthSession;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the full route table over shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/research", post(research))
        .route("/summarize", post(summarize))
        .route("/verify", post(verify))
        .route("/complete", post(complete))
        .route("/stats", get(stats))
        .route("/cache", delete(clear_cache))
        .route("/health", get(health))
        .with_state(state)
}

/// Body for `/research` and `/complete`.
#[derive(Debug, Deserialize)]
pub struct ResearchRequest {
    /// The research question.
    pub query: String,
}

/// Body for `/summarize`.
#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    /// The text to summarize.
    pub text: String,
    /// Variant name; unknown values fall back to `brief`.
    #[serde(default = "default_summary_type")]
    pub summary_type: String,
}

fn default_summary_type() -> String {
    "brief".to_owned()
}

/// Body for `/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// The text whose claims get verified.
    pub text: String,
}

/// Run the gate and the limiter for one endpoint.
fn admit(state: &AppState, headers: &HeaderMap, endpoint: &str) -> Result<AuthSession, ApiError> {
    let presented = headers
        .get(state.api_key_header())
        .and_then(|v| v.to_str().ok());
    let session = state.gate.authenticate(presented)?;
    state.limiter.admit(&session.key, endpoint)?;
    info!(
        endpoint,
        caller = %session.name,
        usage = %session.usage_display(),
        "request admitted"
    );
    Ok(session)
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// GET / — public service descriptor.
async fn root() -> Json<Value> {
    Json(json!({
        "message": "AI Research Assistant API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "research": "/research",
            "summarize": "/summarize",
            "verify": "/verify",
            "complete": "/complete"
        }
    }))
}

/// POST /research — single-stage research with response caching.
async fn research(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<Value>, ApiError> {
    let session = admit(&state, &headers, "research")?;
    require_non_empty(&request.query, "query")?;

    if let Some(mut cached) = state.cache.get(&request.query) {
        if let Some(obj) = cached.as_object_mut() {
            let _ = obj.insert("usage".to_owned(), json!(session.usage_display()));
        }
        return Ok(Json(cached));
    }

    let content = state
        .orchestrator
        .researcher()
        .research(&request.query)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    let payload = json!({
        "status": "success",
        "query": request.query,
        "research": content,
    });
    let mut stored = state.cache.put(&request.query, payload);
    if let Some(obj) = stored.as_object_mut() {
        let _ = obj.insert("usage".to_owned(), json!(session.usage_display()));
    }
    Ok(Json(stored))
}

/// POST /summarize — one summary variant over caller-provided text.
async fn summarize(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<Value>, ApiError> {
    let session = admit(&state, &headers, "summarize")?;
    require_non_empty(&request.text, "text")?;

    let variant = SummaryVariant::from_str_lossy(&request.summary_type);
    let summary = state
        .orchestrator
        .summarizer()
        .summarize(&request.text, variant)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(Json(json!({
        "status": "success",
        "summary_type": request.summary_type,
        "result": summary,
        "usage": session.usage_display(),
    })))
}

/// POST /verify — claim extraction and verification over text.
async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<Value>, ApiError> {
    let session = admit(&state, &headers, "verify")?;
    require_non_empty(&request.text, "text")?;

    let verdict = state
        .orchestrator
        .fact_checker()
        .verify(&request.text)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(Json(json!({
        "status": "success",
        "verification": verdict,
        "usage": session.usage_display(),
    })))
}

/// POST /complete — the full three-agent workflow.
async fn complete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<Value>, ApiError> {
    let _session = admit(&state, &headers, "complete")?;
    require_non_empty(&request.query, "query")?;

    let report = state.orchestrator.run(&request.query).await;
    serde_json::to_value(&report)
        .map(Json)
        .map_err(|err| ApiError::Internal(err.to_string()))
}

/// GET /stats — public cache, rate-limit, and uptime snapshot.
async fn stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(json!({
        "cache": state.cache.stats(),
        "rate_limits": state.limiter.snapshot(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    })))
}

/// DELETE /cache — authenticated cache reset.
async fn clear_cache(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let _session = admit(&state, &headers, "cache")?;
    state.cache.clear();
    info!("cache cleared");
    Ok(Json(json!({ "message": "Cache cleared successfully" })))
}

/// GET /health — public liveness probe with a generous rate ceiling.
async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.limiter.admit("public", "health")?;
    Ok(Json(json!({ "status": "healthy" })))
}
