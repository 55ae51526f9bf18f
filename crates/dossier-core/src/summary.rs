//! Summary variants and compression accounting.

use serde::{Deserialize, Serialize};

/// The four fixed summary formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryVariant {
    /// 2-3 sentences, most important findings only.
    Brief,
    /// One comprehensive paragraph with statistics and context.
    Detailed,
    /// 5-7 bullet points, one sentence each.
    KeyPoints,
    /// Business-stakeholder framing: what, why, actions.
    Executive,
}

impl SummaryVariant {
    /// All variants in the order the orchestrator runs them.
    pub const ALL: [Self; 4] = [Self::Brief, Self::Detailed, Self::KeyPoints, Self::Executive];

    /// Wire name (snake_case).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Brief => "brief",
            Self::Detailed => "detailed",
            Self::KeyPoints => "key_points",
            Self::Executive => "executive",
        }
    }

    /// Parse a wire name, falling back to [`Self::Brief`] for anything
    /// unrecognized. Unknown `summary_type` values are served as `brief`
    /// rather than rejected.
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "detailed" => Self::Detailed,
            "key_points" => Self::KeyPoints,
            "executive" => Self::Executive,
            _ => Self::Brief,
        }
    }
}

impl std::fmt::Display for SummaryVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compression ratio of a summary against its source, as a percentage
/// string: `(1 - summary_len / source_len) * 100`, formatted `"{:.1}%"`.
///
/// A zero-length source would divide by zero; that case yields `"N/A"`.
#[must_use]
pub fn compression_ratio(summary_len: usize, source_len: usize) -> String {
    if source_len == 0 {
        return "N/A".to_owned();
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = (1.0 - summary_len as f64 / source_len as f64) * 100.0;
    format!("{ratio:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(SummaryVariant::Brief.as_str(), "brief");
        assert_eq!(SummaryVariant::Detailed.as_str(), "detailed");
        assert_eq!(SummaryVariant::KeyPoints.as_str(), "key_points");
        assert_eq!(SummaryVariant::Executive.as_str(), "executive");
    }

    #[test]
    fn parse_known_names() {
        assert_eq!(
            SummaryVariant::from_str_lossy("detailed"),
            SummaryVariant::Detailed
        );
        assert_eq!(
            SummaryVariant::from_str_lossy("key_points"),
            SummaryVariant::KeyPoints
        );
        assert_eq!(
            SummaryVariant::from_str_lossy("executive"),
            SummaryVariant::Executive
        );
    }

    #[test]
    fn unknown_names_fall_back_to_brief() {
        assert_eq!(
            SummaryVariant::from_str_lossy("haiku"),
            SummaryVariant::Brief
        );
        assert_eq!(SummaryVariant::from_str_lossy(""), SummaryVariant::Brief);
        // Case-sensitive on purpose.
        assert_eq!(
            SummaryVariant::from_str_lossy("Detailed"),
            SummaryVariant::Brief
        );
    }

    #[test]
    fn all_ordering_matches_report_order() {
        assert_eq!(
            SummaryVariant::ALL,
            [
                SummaryVariant::Brief,
                SummaryVariant::Detailed,
                SummaryVariant::KeyPoints,
                SummaryVariant::Executive,
            ]
        );
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_value(SummaryVariant::KeyPoints).unwrap();
        assert_eq!(json, "key_points");
    }

    #[test]
    fn empty_summary_compresses_fully() {
        assert_eq!(compression_ratio(0, 100), "100.0%");
    }

    #[test]
    fn equal_lengths_compress_nothing() {
        assert_eq!(compression_ratio(100, 100), "0.0%");
    }

    #[test]
    fn zero_source_is_not_a_ratio() {
        assert_eq!(compression_ratio(10, 0), "N/A");
    }

    #[test]
    fn longer_summary_goes_negative() {
        assert_eq!(compression_ratio(150, 100), "-50.0%");
    }

    #[test]
    fn typical_ratio_rounds_to_one_decimal() {
        assert_eq!(compression_ratio(333, 1000), "66.7%");
    }
}
