//! Claim verification types.
//!
//! A [`Claim`] is one atomic factual statement extracted from generated text;
//! the fact-checker scores each claim and folds the list into a
//! [`ReliabilityVerdict`]. Status and rating strings serialize as the
//! uppercase report labels clients key on.

use serde::{Deserialize, Serialize};

use crate::constants::{
    HIGH_CONFIDENCE, HIGH_SUPPORT_RATIO, MODERATE_CONFIDENCE, MODERATE_SUPPORT_RATIO,
};

/// Verification outcome for a single claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    /// The claim is backed by the research context.
    #[serde(rename = "SUPPORTED")]
    Supported,
    /// The claim is partially backed.
    #[serde(rename = "PARTIALLY SUPPORTED")]
    PartiallySupported,
    /// The claim is contradicted or unbacked.
    #[serde(rename = "UNSUPPORTED")]
    Unsupported,
    /// No recognizable status label in the verification text.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

/// Aggregate reliability rating over a set of verified claims.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReliabilityRating {
    /// Support ratio >= 0.8 and mean confidence >= 80.
    #[serde(rename = "HIGH RELIABILITY")]
    High,
    /// Support ratio >= 0.6 and mean confidence >= 60.
    #[serde(rename = "MODERATE RELIABILITY")]
    Moderate,
    /// Anything below the moderate thresholds.
    #[serde(rename = "LOW RELIABILITY - VERIFY INDEPENDENTLY")]
    Low,
    /// No claims were available to verify.
    #[serde(rename = "INSUFFICIENT DATA")]
    InsufficientData,
}

impl ReliabilityRating {
    /// Rate a claim set from its support ratio and mean confidence.
    ///
    /// The zero-claims case is checked before the ratio thresholds so an
    /// empty set never reads as a 0.0 support ratio.
    #[must_use]
    pub fn from_aggregate(supported: u64, total: u64, avg_confidence: f64) -> Self {
        if total == 0 {
            return Self::InsufficientData;
        }
        #[allow(clippy::cast_precision_loss)]
        let support_ratio = supported as f64 / total as f64;
        if support_ratio >= HIGH_SUPPORT_RATIO && avg_confidence >= HIGH_CONFIDENCE {
            Self::High
        } else if support_ratio >= MODERATE_SUPPORT_RATIO && avg_confidence >= MODERATE_CONFIDENCE {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

/// One verified factual claim.
///
/// Built by the fact-checker and immutable afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claim {
    /// Position in the extracted list (1-based).
    pub index: usize,
    /// The claim text as extracted (numbered-list line, trimmed).
    pub claim: String,
    /// Verification outcome.
    pub status: VerificationStatus,
    /// Confidence score, 0-100.
    pub confidence: f64,
    /// Free-form evidence / concerns text from the verification call.
    pub verification_details: String,
}

/// Aggregate verdict over a list of claims.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReliabilityVerdict {
    /// Number of claims that were verified.
    pub total_claims_checked: u64,
    /// How many came back SUPPORTED.
    pub supported_claims: u64,
    /// Mean confidence, formatted `"{:.1}%"`.
    pub average_confidence: String,
    /// Categorical rating.
    pub overall_reliability: ReliabilityRating,
    /// The individual claims.
    pub claims: Vec<Claim>,
}

impl ReliabilityVerdict {
    /// Aggregate a list of verified claims into a verdict.
    #[must_use]
    pub fn from_claims(claims: Vec<Claim>) -> Self {
        let total = claims.len() as u64;
        let supported = claims
            .iter()
            .filter(|c| c.status == VerificationStatus::Supported)
            .count() as u64;
        let avg_confidence = if claims.is_empty() {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let n = claims.len() as f64;
            claims.iter().map(|c| c.confidence).sum::<f64>() / n
        };
        Self {
            total_claims_checked: total,
            supported_claims: supported,
            average_confidence: format!("{avg_confidence:.1}%"),
            overall_reliability: ReliabilityRating::from_aggregate(
                supported,
                total,
                avg_confidence,
            ),
            claims,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(status: VerificationStatus, confidence: f64) -> Claim {
        Claim {
            index: 1,
            claim: "1. Something happened.".into(),
            status,
            confidence,
            verification_details: String::new(),
        }
    }

    #[test]
    fn zero_claims_is_insufficient_data() {
        assert_eq!(
            ReliabilityRating::from_aggregate(0, 0, 0.0),
            ReliabilityRating::InsufficientData
        );
    }

    #[test]
    fn four_of_five_at_85_is_high() {
        assert_eq!(
            ReliabilityRating::from_aggregate(4, 5, 85.0),
            ReliabilityRating::High
        );
    }

    #[test]
    fn three_of_five_at_65_is_moderate() {
        assert_eq!(
            ReliabilityRating::from_aggregate(3, 5, 65.0),
            ReliabilityRating::Moderate
        );
    }

    #[test]
    fn two_of_five_at_40_is_low() {
        assert_eq!(
            ReliabilityRating::from_aggregate(2, 5, 40.0),
            ReliabilityRating::Low
        );
    }

    #[test]
    fn high_ratio_but_low_confidence_is_not_high() {
        // 4/5 supported but weak confidence falls through both tiers
        assert_eq!(
            ReliabilityRating::from_aggregate(4, 5, 50.0),
            ReliabilityRating::Low
        );
    }

    #[test]
    fn boundary_values_hit_high() {
        assert_eq!(
            ReliabilityRating::from_aggregate(4, 5, 80.0),
            ReliabilityRating::High
        );
    }

    #[test]
    fn verdict_from_empty_claims() {
        let verdict = ReliabilityVerdict::from_claims(vec![]);
        assert_eq!(verdict.total_claims_checked, 0);
        assert_eq!(verdict.supported_claims, 0);
        assert_eq!(verdict.average_confidence, "0.0%");
        assert_eq!(
            verdict.overall_reliability,
            ReliabilityRating::InsufficientData
        );
    }

    #[test]
    fn verdict_counts_only_fully_supported() {
        let verdict = ReliabilityVerdict::from_claims(vec![
            claim(VerificationStatus::Supported, 90.0),
            claim(VerificationStatus::PartiallySupported, 70.0),
            claim(VerificationStatus::Unsupported, 20.0),
        ]);
        assert_eq!(verdict.total_claims_checked, 3);
        assert_eq!(verdict.supported_claims, 1);
        assert_eq!(verdict.average_confidence, "60.0%");
        assert_eq!(verdict.overall_reliability, ReliabilityRating::Low);
    }

    #[test]
    fn status_serializes_as_uppercase_labels() {
        let json = serde_json::to_value(VerificationStatus::PartiallySupported).unwrap();
        assert_eq!(json, "PARTIALLY SUPPORTED");
        let json = serde_json::to_value(VerificationStatus::Unsupported).unwrap();
        assert_eq!(json, "UNSUPPORTED");
    }

    #[test]
    fn rating_serializes_as_report_strings() {
        let json = serde_json::to_value(ReliabilityRating::Low).unwrap();
        assert_eq!(json, "LOW RELIABILITY - VERIFY INDEPENDENTLY");
        let json = serde_json::to_value(ReliabilityRating::InsufficientData).unwrap();
        assert_eq!(json, "INSUFFICIENT DATA");
    }

    #[test]
    fn claim_serde_roundtrip() {
        let c = claim(VerificationStatus::Supported, 73.0);
        let json = serde_json::to_string(&c).unwrap();
        let back: Claim = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, VerificationStatus::Supported);
        assert!((back.confidence - 73.0).abs() < f64::EPSILON);
    }
}
