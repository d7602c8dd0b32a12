//! Scam intent classifier.
//!
//! # Confidence formula
//!
//! Every indicator carries a weight `w` in `(0, 1)`. Scores are combined with a
//! noisy-OR so that each additional distinct indicator, and any critical one,
//! raises the score without ever reaching 1:
//!
//! - category score `S_c = 1 - Π (1 - w_i)` over the indicators matched in `c`
//! - message score `m = 1 - Π (1 - w_i)` over every matched indicator
//!
//! The message score is then reinforced by the most recent matching
//! counterpart turn in the session history (confidence `p`, category `q`):
//!
//! - same category: `1 - (1 - p)(1 - m)`, which is never below `p`
//! - different category: `1 - (1 - m)(1 - p / 2)`
//!
//! The result is capped at [`CONFIDENCE_CAP`]. Text with no matches yields
//! confidence 0 and category `Unknown` regardless of history.
//!
//! The selected category is the one with the highest `S_c`; ties go to the
//! earlier entry of [`ScamCategory::SELECTION_PRIORITY`]. Tactic-only groups
//! contribute to `m` but never win; when only they match the category falls
//! back to `Phishing`.

use super::model::{CONFIDENCE_CAP, DetectionResult};
use crate::catalog::{PatternCatalog, ScamCategory};
use crate::session::Turn;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Category used when only tactic groups (urgency, fee demands) match.
const TACTIC_ONLY_FALLBACK: ScamCategory = ScamCategory::Phishing;

/// Scores of a single group for one message.
#[derive(Debug, Clone, PartialEq)]
struct GroupScore {
    name: String,
    category: Option<ScamCategory>,
    score: f64,
    weights: Vec<f64>,
    terms: Vec<String>,
    critical: bool,
}

/// Classifies counterpart text against the shared pattern catalog.
#[derive(Debug, Clone)]
pub struct Detector {
    catalog: Arc<PatternCatalog>,
}

impl Detector {
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    /// Classifies `text` in the context of the session's prior turns.
    ///
    /// `history` is the session's turn log before this message. Agent turns in
    /// it are ignored.
    pub fn classify(&self, text: &str, history: &[Turn]) -> DetectionResult {
        let text = text.trim();
        if text.is_empty() {
            return DetectionResult::none();
        }

        let groups = self.score_groups(text);
        if groups.is_empty() {
            return DetectionResult::none();
        }

        let message_score = 1.0
            - groups
                .iter()
                .flat_map(|g| g.weights.iter())
                .map(|w| 1.0 - w)
                .product::<f64>();

        let category = select_category(&groups);
        let prior = prior_signal(history);
        let confidence = match prior {
            Some((p, q)) if q == category => 1.0 - (1.0 - p) * (1.0 - message_score),
            Some((p, _)) => 1.0 - (1.0 - message_score) * (1.0 - p / 2.0),
            None => message_score,
        }
        .min(CONFIDENCE_CAP);

        let matched_categories: BTreeSet<String> = groups.iter().map(|g| g.name.clone()).collect();
        let matched_terms: BTreeSet<String> = groups
            .iter()
            .flat_map(|g| g.terms.iter().cloned())
            .collect();
        let critical = groups.iter().any(|g| g.critical);
        let reasoning = self.reasoning(category, &groups, prior.is_some());

        tracing::debug!(
            "[Detector] category={} message_score={:.3} confidence={:.3} groups={:?}",
            category,
            message_score,
            confidence,
            matched_categories
        );

        DetectionResult {
            category,
            confidence,
            matched_categories,
            matched_terms,
            critical,
            reasoning,
        }
    }

    fn score_groups(&self, text: &str) -> Vec<GroupScore> {
        self.catalog
            .groups()
            .iter()
            .filter_map(|group| {
                let matched: Vec<_> = group
                    .indicators
                    .iter()
                    .filter_map(|indicator| indicator.find(text).map(|m| (indicator, m)))
                    .collect();
                if matched.is_empty() {
                    return None;
                }
                let score = 1.0 - matched.iter().map(|(i, _)| 1.0 - i.weight).product::<f64>();
                Some(GroupScore {
                    name: group.name.clone(),
                    category: group.category,
                    score,
                    weights: matched.iter().map(|(i, _)| i.weight).collect(),
                    terms: matched
                        .iter()
                        .filter_map(|(_, fragment)| normalize_term(fragment))
                        .collect(),
                    critical: matched.iter().any(|(i, _)| i.critical),
                })
            })
            .collect()
    }

    fn reasoning(&self, category: ScamCategory, groups: &[GroupScore], reinforced: bool) -> String {
        let tactics: Vec<&str> = groups
            .iter()
            .filter_map(|g| self.catalog.group(&g.name))
            .map(|group| group.tactic.as_str())
            .collect();
        let mut reasoning = format!("Detected {}: {}", category, tactics.join("; "));
        if reinforced {
            reasoning.push_str(" (reinforced by earlier turns)");
        }
        reasoning
    }
}

/// Highest category score wins; ties follow the fixed priority order.
fn select_category(groups: &[GroupScore]) -> ScamCategory {
    groups
        .iter()
        .filter_map(|g| g.category.map(|c| (c, g.score)))
        .max_by(|(ca, sa), (cb, sb)| {
            sa.total_cmp(sb)
                .then_with(|| cb.priority().cmp(&ca.priority()))
        })
        .map(|(category, _)| category)
        .unwrap_or(TACTIC_ONLY_FALLBACK)
}

fn normalize_term(fragment: &str) -> Option<String> {
    let term = fragment
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    (!term.is_empty()).then_some(term)
}

/// Confidence and category of the most recent matching counterpart turn.
fn prior_signal(history: &[Turn]) -> Option<(f64, ScamCategory)> {
    history
        .iter()
        .rev()
        .find(|turn| turn.message.is_counterpart() && turn.detection.is_match())
        .map(|turn| (turn.detection.confidence, turn.detection.category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use crate::detection::ConfidenceBand;
    use crate::session::Message;

    fn detector() -> Detector {
        Detector::new(Arc::new(default_catalog().unwrap()))
    }

    fn turn(index: usize, text: &str, detection: DetectionResult) -> Turn {
        Turn {
            index,
            message: Message::counterpart(text, 0),
            detection,
            strategy: None,
        }
    }

    #[test]
    fn test_empty_text_is_unknown() {
        let result = detector().classify("   ", &[]);
        assert_eq!(result, DetectionResult::none());
    }

    #[test]
    fn test_benign_text_is_unknown() {
        let result = detector().classify("Hi, are we still meeting for lunch tomorrow?", &[]);
        assert_eq!(result.category, ScamCategory::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert!(result.matched_categories.is_empty());
    }

    #[test]
    fn test_prize_with_upi_handle() {
        let result = detector().classify("You won Rs. 5,00,000! Send to upi:winner@paytm", &[]);
        assert_eq!(result.category, ScamCategory::UpiFraud);
        assert!(result.confidence >= 0.6, "confidence {}", result.confidence);
        assert!(result.matched_categories.contains("fake_offer"));
        assert!(result.matched_categories.contains("upi_fraud"));
    }

    #[test]
    fn test_blocked_account_is_medium_band() {
        let result = detector().classify("Your account will be blocked today", &[]);
        assert_eq!(result.band(0.6), ConfidenceBand::Medium);
        assert_eq!(result.category, ScamCategory::Phishing);
        assert!(result.matched_categories.contains("urgency"));
    }

    #[test]
    fn test_critical_indicator_boosts_confidence() {
        let d = detector();
        let generic = d.classify("Did you get an OTP?", &[]);
        let critical = d.classify("Did you get an OTP? Share the OTP with me", &[]);
        assert!(critical.critical);
        assert!(!generic.critical);
        assert!(critical.confidence > generic.confidence);
        assert_eq!(critical.category, ScamCategory::OtpHarvesting);
    }

    #[test]
    fn test_diversity_increases_confidence() {
        let d = detector();
        let one = d.classify("You have won a lottery", &[]);
        let two = d.classify("You have won a lottery in our lucky draw", &[]);
        assert!(two.confidence > one.confidence);
    }

    #[test]
    fn test_same_category_reinforces() {
        let d = detector();
        let first = d.classify("Your SBI bank account has suspicious activity", &[]);
        let history = vec![turn(0, "first", first.clone())];
        let second = d.classify("Please confirm your debit card", &history);
        assert_eq!(first.category, ScamCategory::BankFraud);
        assert_eq!(second.category, ScamCategory::BankFraud);
        assert!(second.confidence >= first.confidence);
    }

    #[test]
    fn test_non_matching_turn_does_not_reset_prior() {
        let d = detector();
        let first = d.classify("Your SBI bank account has suspicious activity", &[]);
        let history = vec![
            turn(0, "first", first.clone()),
            turn(1, "ok", DetectionResult::none()),
        ];
        let third = d.classify("Your debit card is frozen", &history);
        assert!(third.confidence >= first.confidence);
    }

    #[test]
    fn test_agent_turns_ignored_as_prior() {
        let d = detector();
        let agent_turn = Turn {
            index: 0,
            message: Message::agent("Share the OTP?", 0),
            detection: d.classify("Share the OTP with me", &[]),
            strategy: None,
        };
        let result = d.classify("Your parcel delivery is pending", &[agent_turn]);
        let fresh = d.classify("Your parcel delivery is pending", &[]);
        assert_eq!(result.confidence, fresh.confidence);
    }

    #[test]
    fn test_confidence_capped() {
        let d = detector();
        let text = "URGENT! Your SBI account will be blocked today. Share the OTP and enter PIN. \
                    Click here https://sbi-kyc-verify.xyz/login to verify your account. \
                    Lottery lucky draw processing fee, approve the collect request on upi";
        let mut history = Vec::new();
        let mut last = 0.0;
        for i in 0..5 {
            let result = d.classify(text, &history);
            assert!(result.confidence <= CONFIDENCE_CAP);
            assert!(result.confidence >= last);
            last = result.confidence;
            history.push(turn(i, text, result));
        }
    }

    #[test]
    fn test_tie_break_uses_priority() {
        let groups = vec![
            GroupScore {
                name: "fake_offer".into(),
                category: Some(ScamCategory::FakeOffer),
                score: 0.3,
                weights: vec![0.3],
                terms: vec!["lottery".into()],
                critical: false,
            },
            GroupScore {
                name: "bank_fraud".into(),
                category: Some(ScamCategory::BankFraud),
                score: 0.3,
                weights: vec![0.3],
                terms: vec!["bank account".into()],
                critical: false,
            },
        ];
        assert_eq!(select_category(&groups), ScamCategory::BankFraud);
    }
}
