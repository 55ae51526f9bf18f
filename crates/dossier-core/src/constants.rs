//! Tunable constants shared across the pipeline.

/// Maximum number of extracted claims that are individually verified.
///
/// Each verification is one generation call, so this caps the cost and
/// latency of a single `/verify` or `/complete` request.
pub const CLAIM_VERIFICATION_CAP: usize = 5;

/// Confidence assigned to a claim when no percentage is found in the
/// verification text.
pub const DEFAULT_CONFIDENCE: f64 = 50.0;

/// Support ratio and mean confidence required for a HIGH reliability rating.
pub const HIGH_SUPPORT_RATIO: f64 = 0.8;
/// Mean confidence floor for HIGH reliability.
pub const HIGH_CONFIDENCE: f64 = 80.0;

/// Support ratio and mean confidence required for MODERATE reliability.
pub const MODERATE_SUPPORT_RATIO: f64 = 0.6;
/// Mean confidence floor for MODERATE reliability.
pub const MODERATE_CONFIDENCE: f64 = 60.0;

/// Maximum number of web search hits fed into the research prompt.
pub const MAX_SEARCH_RESULTS: usize = 5;
