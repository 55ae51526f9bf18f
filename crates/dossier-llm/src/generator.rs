//! # Generator Trait
//!
//! Core abstraction for text-generation backends. The pipeline stages
//! (researcher, summarizer, fact-checker) depend only on this trait, so a
//! test can substitute a canned generator and the orchestrator never knows.

use async_trait::async_trait;

/// Result type alias for generator operations.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Errors that can occur during a generation call.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend returned an API error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
        /// Whether this error can be retried.
        retryable: bool,
    },

    /// Backend returned a response with no usable text.
    #[error("empty response from model")]
    EmptyResponse,

    /// Backend-specific error.
    #[error("{message}")]
    Other {
        /// Error description.
        message: String,
    },
}

impl GeneratorError {
    /// Whether this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| {
                        s == reqwest::StatusCode::TOO_MANY_REQUESTS || s.is_server_error()
                    })
            }
            Self::Api { retryable, .. } => *retryable,
            Self::Json(_) | Self::EmptyResponse | Self::Other { .. } => false,
        }
    }

    /// Error category string for logging.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::Http(_) => "network",
            Self::Json(_) => "parse",
            Self::Api { .. } => "api",
            Self::EmptyResponse => "empty",
            Self::Other { .. } => "unknown",
        }
    }
}

/// Core text-generation trait.
///
/// Implementors must be `Send + Sync` for use across async tasks. One call
/// is one prompt; there is no streaming and no conversation state.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Current model ID (e.g., `"gemini-2.5-flash"`).
    fn model(&self) -> &str;

    /// Generate text for a prompt.
    async fn generate(&self, prompt: &str) -> GeneratorResult<String>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
