//! # dossier-core
//!
//! Foundation types shared by every other dossier crate:
//!
//! - **Claims**: `Claim`, `VerificationStatus`, `ReliabilityRating`,
//!   `ReliabilityVerdict` for the fact-checking pipeline
//! - **Summaries**: `SummaryVariant` enum and compression-ratio helper
//! - **Reports**: `ResearchReport` with its per-stage blocks
//! - **Errors**: `GateError` for the admission-control stack

#![deny(unsafe_code)]

pub mod claims;
pub mod constants;
pub mod errors;
pub mod report;
pub mod summary;

pub use claims::{Claim, ReliabilityRating, ReliabilityVerdict, VerificationStatus};
pub use errors::GateError;
pub use report::{ResearchReport, ResearchStage, StageStatus, SummaryStage, VerificationStage};
pub use summary::SummaryVariant;
