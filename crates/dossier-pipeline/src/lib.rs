//! # dossier-pipeline
//!
//! The research pipeline: independently failable stages over a shared
//! [`Generator`](dossier_llm::Generator) seam.
//!
//! - [`Researcher`]: web search + one analysis call
//! - [`Summarizer`]: the four fixed summary variants with compression stats
//! - [`FactChecker`]: claim extraction, per-claim verification, verdict
//! - [`Orchestrator`]: sequences the three stages into one report,
//!   tolerating per-stage failure

#![deny(unsafe_code)]

pub mod fact_checker;
pub mod orchestrator;
pub mod researcher;
pub mod search;
pub mod summarizer;

pub use fact_checker::FactChecker;
pub use orchestrator::Orchestrator;
pub use researcher::Researcher;
pub use search::{BraveSearchClient, SearchClient, SearchError, SearchHit, StubSearchClient};
pub use summarizer::{Summarizer, Summary};
