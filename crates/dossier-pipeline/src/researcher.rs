//! Research stage: web search plus one analysis call.
//!
//! Search failures are swallowed (treated as no results) so a flaky search
//! backend degrades the answer instead of failing the stage; generation
//! failures propagate to the caller, which records them per-stage.

use std::sync::Arc;

use tracing::{debug, info};

use dossier_core::constants::MAX_SEARCH_RESULTS;
use dossier_llm::{with_retry, Generator, GeneratorResult, RetryConfig};

use crate::search::{SearchClient, SearchHit};

/// Answer returned when the search backend yields nothing to analyze.
pub const NO_RESULTS_ANSWER: &str = "No search results found.";

/// The research agent.
pub struct Researcher {
    generator: Arc<dyn Generator>,
    search: Arc<dyn SearchClient>,
    retry: RetryConfig,
}

impl Researcher {
    /// Create a researcher over a generator and search client.
    #[must_use]
    pub fn new(
        generator: Arc<dyn Generator>,
        search: Arc<dyn SearchClient>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            generator,
            search,
            retry,
        }
    }

    /// Research a question: search the web, then analyze the hits.
    pub async fn research(&self, question: &str) -> GeneratorResult<String> {
        let hits = match self.search.search(question, MAX_SEARCH_RESULTS).await {
            Ok(hits) => hits,
            Err(err) => {
                debug!(error = %err, "search failed, continuing with no results");
                Vec::new()
            }
        };

        if hits.is_empty() {
            return Ok(NO_RESULTS_ANSWER.to_owned());
        }

        info!(sources = hits.len(), "analyzing search results");
        let prompt = build_prompt(question, &hits);
        with_retry(&self.retry, || self.generator.generate(&prompt)).await
    }
}

/// Format the numbered source blocks and the analysis prompt.
fn build_prompt(question: &str, hits: &[SearchHit]) -> String {
    let formatted = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            format!(
                "Source {}: {}\nURL: {}\nContent: {}",
                i + 1,
                hit.title,
                hit.url,
                hit.snippet
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are a research assistant. Analyze the web search results and provide \
         a comprehensive answer to the user's question. Cite sources by number.\n\n\
         Question: {question}\n\n\
         Search Results:\n{formatted}\n\n\
         Provide a detailed answer based on these sources."
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
