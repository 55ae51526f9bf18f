//! # dossier-api
//!
//! Research assistant API server binary — loads settings, wires the Gemini
//! clients and the admission stack, and starts the HTTP server.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dossier_llm::{GeminiClient, GeminiConfig, Generator, RetryConfig};
use dossier_pipeline::{
    BraveSearchClient, FactChecker, Orchestrator, Researcher, SearchClient, StubSearchClient,
    Summarizer,
};
use dossier_server::DossierServer;
use dossier_settings::{load_settings_from_path, DossierSettings, LlmSettings};

/// Research assistant API server.
#[derive(Parser, Debug)]
#[command(name = "dossier-api", about = "Research assistant API server")]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Path to a JSON settings file merged over the defaults.
    #[arg(long, default_value = "dossier.json")]
    settings: PathBuf,
}

/// One Gemini client per temperature profile.
fn gemini(llm: &LlmSettings, model: &str, temperature: f64, api_key: &str) -> Result<GeminiClient> {
    GeminiClient::new(GeminiConfig {
        base_url: llm.base_url.clone(),
        model: model.to_owned(),
        api_key: api_key.to_owned(),
        temperature,
        timeout_secs: llm.request_timeout_secs,
    })
    .with_context(|| format!("failed to build Gemini client for {model}"))
}

fn build_orchestrator(settings: &DossierSettings) -> Result<Orchestrator> {
    let api_key = std::env::var("GOOGLE_API_KEY")
        .context("GOOGLE_API_KEY must be set (Gemini API key)")?;
    let llm = &settings.llm;

    let research_gen: Arc<dyn Generator> = Arc::new(gemini(
        llm,
        &llm.research_model,
        llm.research_temperature,
        &api_key,
    )?);
    let summary_gen: Arc<dyn Generator> = Arc::new(gemini(
        llm,
        &llm.summary_model,
        llm.summary_temperature,
        &api_key,
    )?);
    let verify_gen: Arc<dyn Generator> = Arc::new(gemini(
        llm,
        &llm.research_model,
        llm.verify_temperature,
        &api_key,
    )?);

    let search: Arc<dyn SearchClient> = match std::env::var("BRAVE_API_KEY") {
        Ok(key) if !key.is_empty() => {
            info!("web search enabled (Brave)");
            Arc::new(BraveSearchClient::new(reqwest::Client::new(), key))
        }
        _ => {
            warn!("BRAVE_API_KEY not set; research will run without search results");
            Arc::new(StubSearchClient)
        }
    };

    let retry = RetryConfig::default();
    Ok(Orchestrator::new(
        Researcher::new(research_gen, search, retry.clone()),
        Summarizer::new(summary_gen, retry.clone()),
        FactChecker::new(verify_gen, retry),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("DOSSIER_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();

    let mut settings = load_settings_from_path(&args.settings)
        .with_context(|| format!("failed to load settings from {}", args.settings.display()))?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    let orchestrator = Arc::new(build_orchestrator(&settings)?);
    info!(
        host = %settings.server.host,
        port = settings.server.port,
        research_model = %settings.llm.research_model,
        summary_model = %settings.llm.summary_model,
        "starting server"
    );

    DossierServer::new(settings, orchestrator)
        .listen()
        .await
        .context("server error")
}
