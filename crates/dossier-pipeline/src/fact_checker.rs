//! Claim extraction and verification.
//!
//! Two LLM passes: one to extract numbered factual claims from the research
//! text, then one verification call per claim (capped). Status and confidence
//! are parsed out of the free-form verification text; the full text is kept
//! as `verification_details`.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, info};

use dossier_core::claims::{Claim, ReliabilityVerdict, VerificationStatus};
use dossier_core::constants::{CLAIM_VERIFICATION_CAP, DEFAULT_CONFIDENCE};
use dossier_llm::{with_retry, Generator, GeneratorResult, RetryConfig};

/// The fact-checker agent.
pub struct FactChecker {
    generator: Arc<dyn Generator>,
    retry: RetryConfig,
}

impl FactChecker {
    /// Create a fact-checker over a generator.
    #[must_use]
    pub fn new(generator: Arc<dyn Generator>, retry: RetryConfig) -> Self {
        Self { generator, retry }
    }

    /// Extract claims from research text and verify each against it.
    ///
    /// At most [`CLAIM_VERIFICATION_CAP`] claims get a verification call; the
    /// rest are dropped. An extraction that yields no numbered lines produces
    /// an empty verdict (INSUFFICIENT DATA), not an error.
    pub async fn verify(&self, research_text: &str) -> GeneratorResult<ReliabilityVerdict> {
        let prompt = extract_prompt(research_text);
        let extraction =
            with_retry(&self.retry, || self.generator.generate(&prompt)).await?;
        let claims = parse_claims(&extraction);
        debug!(extracted = claims.len(), "claims extracted");

        let mut verified = Vec::new();
        for (index, claim) in claims.into_iter().take(CLAIM_VERIFICATION_CAP).enumerate() {
            let prompt = verify_prompt(&claim, research_text);
            let verification =
                with_retry(&self.retry, || self.generator.generate(&prompt)).await?;
            verified.push(Claim {
                index: index + 1,
                status: parse_status(&verification),
                confidence: parse_confidence(&verification),
                verification_details: verification,
                claim,
            });
        }

        let verdict = ReliabilityVerdict::from_claims(verified);
        info!(
            total = verdict.total_claims_checked,
            supported = verdict.supported_claims,
            rating = ?verdict.overall_reliability,
            "claims verified"
        );
        Ok(verdict)
    }
}

fn extract_prompt(research_text: &str) -> String {
    format!(
        "Extract all factual claims from this research text. List each claim as a numbered \
         statement.\n\nResearch:\n{research_text}\n\nFactual Claims (one per line):"
    )
}

fn verify_prompt(claim: &str, research_text: &str) -> String {
    format!(
        "Verify this claim against the research context. Provide:\n\
         1. Verification status: SUPPORTED / PARTIALLY SUPPORTED / UNSUPPORTED\n\
         2. Confidence score: 0-100%\n\
         3. Evidence: Quote supporting text or explain why unsupported\n\
         4. Concerns: Any issues with the claim\n\n\
         Claim: {claim}\n\n\
         Research Context:\n{research_text}\n\n\
         Verification:"
    )
}

fn numbered_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.").unwrap_or_else(|_| unreachable!()))
}

fn confidence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)%").unwrap_or_else(|_| unreachable!()))
}

/// Keep the trimmed lines that start with a numbered-list marker (`1.`).
#[must_use]
pub fn parse_claims(extraction: &str) -> Vec<String> {
    extraction
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && numbered_line_re().is_match(line))
        .map(str::to_owned)
        .collect()
}

/// Pull the verification status out of free-form text.
///
/// Checked in order: UNSUPPORTED first (it contains SUPPORTED as a
/// substring), then PARTIALLY SUPPORTED / PARTIAL, then SUPPORTED.
#[must_use]
pub fn parse_status(text: &str) -> VerificationStatus {
    let upper = text.to_uppercase();
    if upper.contains("UNSUPPORTED") {
        VerificationStatus::Unsupported
    } else if upper.contains("PARTIALLY SUPPORTED") || upper.contains("PARTIAL") {
        VerificationStatus::PartiallySupported
    } else if upper.contains("SUPPORTED") {
        VerificationStatus::Supported
    } else {
        VerificationStatus::Unknown
    }
}

/// First `N%` occurrence in the text, or [`DEFAULT_CONFIDENCE`] if none.
#[must_use]
pub fn parse_confidence(text: &str) -> f64 {
    confidence_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(DEFAULT_CONFIDENCE)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
