//! Summarization stage: the four fixed variants.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use dossier_core::summary::{compression_ratio, SummaryVariant};
use dossier_llm::{with_retry, Generator, GeneratorResult, RetryConfig};

/// One generated summary with compression accounting.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    /// Which variant was generated.
    pub summary_type: SummaryVariant,
    /// The summary text.
    pub summary: String,
    /// Length of the source text in characters.
    pub original_length: usize,
    /// Length of the summary in characters.
    pub summary_length: usize,
    /// `(1 - summary/source) * 100` as `"{:.1}%"`, `"N/A"` for empty source.
    pub compression_ratio: String,
}

/// The summarizer agent.
pub struct Summarizer {
    generator: Arc<dyn Generator>,
    retry: RetryConfig,
}

impl Summarizer {
    /// Create a summarizer over a generator.
    #[must_use]
    pub fn new(generator: Arc<dyn Generator>, retry: RetryConfig) -> Self {
        Self { generator, retry }
    }

    /// Generate one summary variant for a text.
    pub async fn summarize(
        &self,
        text: &str,
        variant: SummaryVariant,
    ) -> GeneratorResult<Summary> {
        let prompt = prompt_for(variant, text);
        let summary = with_retry(&self.retry, || self.generator.generate(&prompt)).await?;
        debug!(
            variant = %variant,
            original_length = text.len(),
            summary_length = summary.len(),
            "summary generated"
        );
        Ok(Summary {
            summary_type: variant,
            compression_ratio: compression_ratio(summary.len(), text.len()),
            original_length: text.len(),
            summary_length: summary.len(),
            summary,
        })
    }
}

/// Prompt template for a variant.
fn prompt_for(variant: SummaryVariant, text: &str) -> String {
    let template = match variant {
        SummaryVariant::Brief => {
            "Summarize this research in 2-3 sentences. Focus on the most important findings only."
        }
        SummaryVariant::Detailed => {
            "Provide a comprehensive paragraph summarizing this research. Include main findings, \
             key statistics, and important context."
        }
        SummaryVariant::KeyPoints => {
            "Extract 5-7 key points from this research as a bullet list. Each point should be one \
             clear sentence."
        }
        SummaryVariant::Executive => {
            "Create an executive summary suitable for business stakeholders. Focus on: What it \
             means, Why it matters, What actions to consider."
        }
    };
    format!("{template}\n\nResearch:\n{text}\n\nSummary:")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
