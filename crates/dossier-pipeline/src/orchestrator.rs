//! Full pipeline: research, summarize, verify.
//!
//! Stages run sequentially and fail independently. A failed stage is recorded
//! in the report with its error message and the remaining stages still run;
//! stages that need the research text record their own failure when it is
//! missing.

use std::time::Instant;

use tracing::{info, warn};

use dossier_core::report::{
    format_elapsed, CompressionStats, ResearchReport, ResearchStage, StageStatus, SummaryStage,
    VerificationStage,
};
use dossier_core::summary::SummaryVariant;

use crate::fact_checker::FactChecker;
use crate::researcher::Researcher;
use crate::summarizer::Summarizer;

/// Error recorded by stages 2 and 3 when stage 1 produced no text.
const NO_RESEARCH_CONTENT: &str = "research content unavailable";

/// Runs the three agents in order and assembles the report.
pub struct Orchestrator {
    researcher: Researcher,
    summarizer: Summarizer,
    fact_checker: FactChecker,
}

impl Orchestrator {
    /// Assemble an orchestrator from the three agents.
    #[must_use]
    pub fn new(researcher: Researcher, summarizer: Summarizer, fact_checker: FactChecker) -> Self {
        Self {
            researcher,
            summarizer,
            fact_checker,
        }
    }

    /// Research-only access for the single-stage endpoint.
    #[must_use]
    pub fn researcher(&self) -> &Researcher {
        &self.researcher
    }

    /// Summarizer access for the single-stage endpoint.
    #[must_use]
    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    /// Fact-checker access for the single-stage endpoint.
    #[must_use]
    pub fn fact_checker(&self) -> &FactChecker {
        &self.fact_checker
    }

    /// Run the complete workflow for a query.
    ///
    /// The report's top-level status is always `"success"`; stage outcomes
    /// are carried per-stage. `agents_executed` lists only the agents whose
    /// stage succeeded.
    pub async fn run(&self, query: &str) -> ResearchReport {
        let started = Instant::now();
        let mut report = ResearchReport::new(query);
        info!(query, "starting research workflow");

        let stage_start = Instant::now();
        match self.researcher.research(query).await {
            Ok(content) => {
                report.attach_research(ResearchStage::success(content, stage_start.elapsed()));
                report.record_agent("Researcher");
            }
            Err(err) => {
                warn!(error = %err, "research stage failed");
                report.attach_research(ResearchStage::failed(err.to_string()));
            }
        }

        let stage = self.summarize_stage(&report).await;
        if stage.status == StageStatus::Success {
            report.record_agent("Summarizer");
        }
        report.attach_summaries(stage);

        let stage = self.verification_stage(&report).await;
        if stage.status == StageStatus::Success {
            report.record_agent("Fact-Checker");
        }
        report.attach_verification(stage);

        report.finish(started.elapsed());
        info!(
            agents = report.agents_executed.len(),
            total_time = report.total_processing_time.as_deref().unwrap_or(""),
            "workflow complete"
        );
        report
    }

    /// Generate all four summary variants over the research content.
    async fn summarize_stage(&self, report: &ResearchReport) -> SummaryStage {
        let Some(content) = report.research_content() else {
            return SummaryStage::failed(NO_RESEARCH_CONTENT.to_owned());
        };

        let stage_start = Instant::now();
        let brief = match self.one_summary(content, SummaryVariant::Brief).await {
            Ok(s) => s,
            Err(e) => return SummaryStage::failed(e),
        };
        let detailed = match self.one_summary(content, SummaryVariant::Detailed).await {
            Ok(s) => s,
            Err(e) => return SummaryStage::failed(e),
        };
        let key_points = match self.one_summary(content, SummaryVariant::KeyPoints).await {
            Ok(s) => s,
            Err(e) => return SummaryStage::failed(e),
        };
        let executive = match self.one_summary(content, SummaryVariant::Executive).await {
            Ok(s) => s,
            Err(e) => return SummaryStage::failed(e),
        };

        SummaryStage {
            status: StageStatus::Success,
            compression_stats: Some(CompressionStats {
                brief: brief.compression_ratio,
                detailed: detailed.compression_ratio,
                key_points: key_points.compression_ratio,
                executive: executive.compression_ratio,
            }),
            brief: Some(brief.summary),
            detailed: Some(detailed.summary),
            key_points: Some(key_points.summary),
            executive: Some(executive.summary),
            processing_time: Some(format_elapsed(stage_start.elapsed())),
            error: None,
        }
    }

    async fn one_summary(
        &self,
        content: &str,
        variant: SummaryVariant,
    ) -> Result<crate::summarizer::Summary, String> {
        self.summarizer.summarize(content, variant).await.map_err(|err| {
            warn!(variant = %variant, error = %err, "summary stage failed");
            err.to_string()
        })
    }

    /// Verify claims over the research content.
    async fn verification_stage(&self, report: &ResearchReport) -> VerificationStage {
        let Some(content) = report.research_content() else {
            return VerificationStage::failed(NO_RESEARCH_CONTENT.to_owned());
        };

        let stage_start = Instant::now();
        match self.fact_checker.verify(content).await {
            Ok(verdict) => VerificationStage::success(verdict, stage_start.elapsed()),
            Err(err) => {
                warn!(error = %err, "verification stage failed");
                VerificationStage::failed(err.to_string())
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
