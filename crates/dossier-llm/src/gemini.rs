//! Gemini REST client.
//!
//! Non-streaming `generateContent` calls against the Gemini API. The base
//! URL is configurable so tests can point the client at a mock server.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generator::{Generator, GeneratorError, GeneratorResult};

/// Configuration for a [`GeminiClient`].
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API base URL (default `https://generativelanguage.googleapis.com`).
    pub base_url: String,
    /// Model ID (e.g. `"gemini-2.5-flash"`).
    pub model: String,
    /// API key, sent as a query parameter.
    pub api_key: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Gemini text-generation client.
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// Create a client from a config.
    pub fn new(config: GeminiConfig) -> GeneratorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }
}

#[async_trait::async_trait]
impl Generator for GeminiClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> GeneratorResult<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message,
                retryable: status.as_u16() == 429 || status.is_server_error(),
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GeneratorError::EmptyResponse);
        }

        debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            response_len = text.len(),
            "generation call complete"
        );
        Ok(text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
