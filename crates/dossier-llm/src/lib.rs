//! # dossier-llm
//!
//! Text-generation backend abstraction.
//!
//! Defines the [`Generator`] trait that every pipeline stage depends on
//! (`generate(prompt) -> Result<String, GeneratorError>`), plus:
//! - [`GeminiClient`]: reqwest implementation against the Gemini REST API
//! - Retry helpers: exponential backoff with jitter for retryable errors

#![deny(unsafe_code)]

pub mod gemini;
pub mod generator;
pub mod retry;

pub use gemini::{GeminiClient, GeminiConfig};
pub use generator::{Generator, GeneratorError, GeneratorResult};
pub use retry::{with_retry, RetryConfig};
