//! Research report data model.
//!
//! A [`ResearchReport`] is built incrementally by the orchestrator, one
//! instance per request. The stage list is append-only and each stage block
//! is attached exactly once; the attach methods ignore a second write rather
//! than overwrite.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::claims::{Claim, ReliabilityRating, ReliabilityVerdict};

/// Outcome of a single pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// The stage produced its output.
    Success,
    /// The stage failed; its `error` field carries the message.
    Failed,
}

/// Format a stage duration the way reports print it (`"1.23s"`).
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

/// Stage 1: research output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResearchStage {
    /// Stage outcome.
    pub status: StageStatus,
    /// Research text (success only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Wall-clock time for the stage (success only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<String>,
    /// Error message (failure only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResearchStage {
    /// A successful research stage.
    #[must_use]
    pub fn success(content: String, elapsed: Duration) -> Self {
        Self {
            status: StageStatus::Success,
            content: Some(content),
            processing_time: Some(format_elapsed(elapsed)),
            error: None,
        }
    }

    /// A failed research stage.
    #[must_use]
    pub fn failed(error: String) -> Self {
        Self {
            status: StageStatus::Failed,
            content: None,
            processing_time: None,
            error: Some(error),
        }
    }
}

/// Per-variant compression percentages for the summary stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompressionStats {
    /// Brief summary compression.
    pub brief: String,
    /// Detailed summary compression.
    pub detailed: String,
    /// Key-points summary compression.
    pub key_points: String,
    /// Executive summary compression.
    pub executive: String,
}

/// Stage 2: the four summaries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SummaryStage {
    /// Stage outcome.
    pub status: StageStatus,
    /// Brief summary text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brief: Option<String>,
    /// Detailed summary text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed: Option<String>,
    /// Key-points summary text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_points: Option<String>,
    /// Executive summary text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executive: Option<String>,
    /// Compression percentages per variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_stats: Option<CompressionStats>,
    /// Wall-clock time for the stage (success only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<String>,
    /// Error message (failure only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummaryStage {
    /// A failed summary stage.
    #[must_use]
    pub fn failed(error: String) -> Self {
        Self {
            status: StageStatus::Failed,
            brief: None,
            detailed: None,
            key_points: None,
            executive: None,
            compression_stats: None,
            processing_time: None,
            error: Some(error),
        }
    }
}

/// Stage 3: claim verification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationStage {
    /// Stage outcome.
    pub status: StageStatus,
    /// Number of claims checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_claims: Option<u64>,
    /// How many came back SUPPORTED.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_claims: Option<u64>,
    /// Mean confidence, `"{:.1}%"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_confidence: Option<String>,
    /// Categorical rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reliability: Option<ReliabilityRating>,
    /// The individual verified claims.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_claims: Option<Vec<Claim>>,
    /// Wall-clock time for the stage (success only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<String>,
    /// Error message (failure only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationStage {
    /// A successful verification stage built from a verdict.
    #[must_use]
    pub fn success(verdict: ReliabilityVerdict, elapsed: Duration) -> Self {
        Self {
            status: StageStatus::Success,
            total_claims: Some(verdict.total_claims_checked),
            supported_claims: Some(verdict.supported_claims),
            average_confidence: Some(verdict.average_confidence),
            reliability: Some(verdict.overall_reliability),
            detailed_claims: Some(verdict.claims),
            processing_time: Some(format_elapsed(elapsed)),
            error: None,
        }
    }

    /// A failed verification stage.
    #[must_use]
    pub fn failed(error: String) -> Self {
        Self {
            status: StageStatus::Failed,
            total_claims: None,
            supported_claims: None,
            average_confidence: None,
            reliability: None,
            detailed_claims: None,
            processing_time: None,
            error: Some(error),
        }
    }
}

/// The complete report for one `/complete` request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResearchReport {
    /// The research question.
    pub query: String,
    /// ISO-8601 creation timestamp.
    pub timestamp: String,
    /// Top-level status. Stays `"success"` even when individual stages fail;
    /// per-stage `status` fields carry the real outcomes.
    pub status: String,
    /// Names of the agents that completed successfully, in execution order.
    pub agents_executed: Vec<String>,
    /// Stage 1 block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research: Option<ResearchStage>,
    /// Stage 2 block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summaries: Option<SummaryStage>,
    /// Stage 3 block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationStage>,
    /// Wall-clock span across all stages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_processing_time: Option<String>,
}

impl ResearchReport {
    /// Start a report for a query, stamped with the current time.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            timestamp: chrono::Local::now().to_rfc3339(),
            status: "success".to_owned(),
            agents_executed: Vec::new(),
            research: None,
            summaries: None,
            verification: None,
            total_processing_time: None,
        }
    }

    /// Record an executed agent. The list is append-only.
    pub fn record_agent(&mut self, name: &str) {
        self.agents_executed.push(name.to_owned());
    }

    /// Attach the research stage. Write-once: a second call is ignored.
    pub fn attach_research(&mut self, stage: ResearchStage) {
        if self.research.is_none() {
            self.research = Some(stage);
        }
    }

    /// Attach the summary stage. Write-once: a second call is ignored.
    pub fn attach_summaries(&mut self, stage: SummaryStage) {
        if self.summaries.is_none() {
            self.summaries = Some(stage);
        }
    }

    /// Attach the verification stage. Write-once: a second call is ignored.
    pub fn attach_verification(&mut self, stage: VerificationStage) {
        if self.verification.is_none() {
            self.verification = Some(stage);
        }
    }

    /// Stamp the total wall-clock time.
    pub fn finish(&mut self, elapsed: Duration) {
        self.total_processing_time = Some(format_elapsed(elapsed));
    }

    /// Research content, if stage 1 succeeded.
    #[must_use]
    pub fn research_content(&self) -> Option<&str> {
        self.research
            .as_ref()
            .and_then(|r| r.content.as_deref())
    }
}
