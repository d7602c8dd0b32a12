//! Detection result types.

use crate::catalog::ScamCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lower edge of the medium confidence band.
pub const MEDIUM_BAND_FLOOR: f64 = 0.35;

/// Confidence is never reported above this value.
pub const CONFIDENCE_CAP: f64 = 0.99;

/// Outcome of classifying one counterpart message.
///
/// Created fresh for every turn and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub category: ScamCategory,
    /// Reinforced confidence in `[0, 0.99]`.
    pub confidence: f64,
    /// Names of the indicator groups that matched (e.g. `"urgency"`).
    pub matched_categories: BTreeSet<String>,
    /// Message fragments that triggered an indicator, lower-cased with
    /// whitespace collapsed.
    pub matched_terms: BTreeSet<String>,
    /// Whether any critical indicator fired.
    pub critical: bool,
    pub reasoning: String,
}

impl DetectionResult {
    /// The result for empty, non-matching, or agent-authored text.
    pub fn none() -> Self {
        Self {
            category: ScamCategory::Unknown,
            confidence: 0.0,
            matched_categories: BTreeSet::new(),
            matched_terms: BTreeSet::new(),
            critical: false,
            reasoning: "No scam indicators detected".to_string(),
        }
    }

    /// True if at least one indicator matched.
    pub fn is_match(&self) -> bool {
        !self.matched_categories.is_empty()
    }

    pub fn band(&self, engagement_threshold: f64) -> ConfidenceBand {
        ConfidenceBand::of(self.confidence, engagement_threshold)
    }
}

impl Default for DetectionResult {
    fn default() -> Self {
        Self::none()
    }
}

/// Coarse classification of a confidence value relative to the engagement threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

impl ConfidenceBand {
    pub fn of(confidence: f64, engagement_threshold: f64) -> Self {
        if confidence >= engagement_threshold {
            ConfidenceBand::High
        } else if confidence >= MEDIUM_BAND_FLOOR {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_unknown_and_zero() {
        let result = DetectionResult::none();
        assert_eq!(result.category, ScamCategory::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert!(!result.is_match());
    }

    #[test]
    fn test_bands() {
        assert_eq!(ConfidenceBand::of(0.1, 0.6), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::of(0.44, 0.6), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::of(0.6, 0.6), ConfidenceBand::High);
    }
}
