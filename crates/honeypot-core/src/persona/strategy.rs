//! Per-turn reply strategy selection.
//!
//! Selection is a small integer scoring pass over the candidate classes:
//!
//! | class                  | rapport (turn <= 2) | extraction |
//! |------------------------|---------------------|------------|
//! | AskClarifyingQuestion  | 3                   | 1          |
//! | Stall                  | 2                   | 0          |
//! | ExpressConcern         | 2                   | 1          |
//! | RequestProof           | 1                   | 1          |
//! | TargetedExtraction(k)  | 0 (+4 if cued)      | 3 (+1 if cued) |
//!
//! Persona affinity adds 1. The most recent class is excluded outright and
//! each older occurrence inside the recency window subtracts 1. Remaining
//! ties are broken by the injected RNG.

use super::model::{Persona, StrategyClass};
use super::preset;
use crate::catalog::EntityKind;
use crate::intelligence::ExtractedIntelligence;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

/// Counterpart turns treated as rapport building.
pub const RAPPORT_TURNS: usize = 2;

/// A kind is no longer targeted after this many prompts.
pub const MAX_TARGET_ATTEMPTS: u32 = 3;

/// Words in the counterpart's text that cue a specific entity kind.
const CUES: &[(EntityKind, &[&str])] = &[
    (EntityKind::UpiId, &["upi", "paytm", "phonepe", "gpay", "google pay"]),
    (EntityKind::BankAccount, &["bank", "account", "transfer", "ifsc", "neft"]),
    (EntityKind::PhoneNumber, &["call", "phone", "contact", "whatsapp"]),
    (EntityKind::PhishingLink, &["click", "link", "website", "url"]),
];

/// Inputs of one strategy decision.
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    pub persona: Persona,
    /// 1-based count of counterpart turns including the current one.
    pub counterpart_turn: usize,
    /// Current counterpart text.
    pub text: &'a str,
    pub intelligence: &'a ExtractedIntelligence,
    pub attempts: &'a BTreeMap<EntityKind, u32>,
    /// Previously used strategies, oldest first.
    pub recent: &'a [StrategyClass],
}

/// Chooses and phrases engaged replies.
#[derive(Debug, Clone)]
pub struct StrategyEngine {
    recent_window: usize,
}

impl StrategyEngine {
    pub fn new(recent_window: usize) -> Self {
        Self {
            recent_window: recent_window.max(1),
        }
    }

    pub fn recent_window(&self) -> usize {
        self.recent_window
    }

    /// Picks the strategy for the current turn.
    pub fn select<R: Rng + ?Sized>(&self, ctx: &StrategyContext<'_>, rng: &mut R) -> StrategyClass {
        let scored = self.score(ctx);
        let best = scored.iter().map(|(_, score)| *score).max().unwrap_or(0);
        let top: Vec<StrategyClass> = scored
            .iter()
            .filter(|(_, score)| *score == best)
            .map(|(class, _)| *class)
            .collect();

        let chosen = top
            .choose(rng)
            .copied()
            .unwrap_or(StrategyClass::AskClarifyingQuestion);

        tracing::debug!(
            "[StrategyEngine] turn={} persona={} chose={} candidates={:?}",
            ctx.counterpart_turn,
            ctx.persona,
            chosen,
            scored
        );
        chosen
    }

    /// Scores every eligible candidate. Candidates excluded by recency are
    /// omitted unless nothing else remains.
    pub fn score(&self, ctx: &StrategyContext<'_>) -> Vec<(StrategyClass, i32)> {
        let rapport = ctx.counterpart_turn <= RAPPORT_TURNS;
        let cued = cued_kinds(ctx.text);

        let mut candidates: Vec<StrategyClass> = StrategyClass::GENERAL.to_vec();
        candidates.extend(
            eligible_targets(ctx.intelligence, ctx.attempts)
                .into_iter()
                .map(StrategyClass::TargetedExtraction),
        );

        let window_start = ctx.recent.len().saturating_sub(self.recent_window);
        let window = &ctx.recent[window_start..];
        let (last, older) = match window.split_last() {
            Some((last, older)) => (Some(*last), older),
            None => (None, window),
        };

        let scored: Vec<(StrategyClass, i32)> = candidates
            .iter()
            .map(|class| {
                let mut score = base_score(*class, rapport);
                if let Some(kind) = class.target() {
                    if cued.contains(&kind) {
                        score += if rapport { 4 } else { 1 };
                    }
                }
                if ctx.persona.has_affinity(*class) {
                    score += 1;
                }
                let repeats = older.iter().filter(|r| r.same_class(*class)).count() as i32;
                (*class, score - repeats)
            })
            .collect();

        let fresh: Vec<(StrategyClass, i32)> = scored
            .iter()
            .copied()
            .filter(|(class, _)| last.is_none_or(|l| !l.same_class(*class)))
            .collect();

        if fresh.is_empty() { scored } else { fresh }
    }

    /// Renders the reply text for `class`.
    pub fn render<R: Rng + ?Sized>(&self, persona: Persona, class: StrategyClass, rng: &mut R) -> String {
        match class.target() {
            Some(kind) => format!(
                "{} {}",
                pick(preset::lead_ins(persona), rng),
                pick(preset::request_templates(kind), rng)
            ),
            None => pick(preset::general_templates(persona, class), rng).to_string(),
        }
    }

    /// Non-revealing reply for turns below the engagement threshold.
    pub fn neutral_reply<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        pick(preset::NEUTRAL_REPLIES, rng).to_string()
    }

    /// Reply for turns arriving after the session is complete.
    pub fn closing_reply<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        pick(preset::CLOSING_REPLIES, rng).to_string()
    }
}

fn base_score(class: StrategyClass, rapport: bool) -> i32 {
    match (class, rapport) {
        (StrategyClass::AskClarifyingQuestion, true) => 3,
        (StrategyClass::Stall, true) => 2,
        (StrategyClass::ExpressConcern, true) => 2,
        (StrategyClass::RequestProof, true) => 1,
        (StrategyClass::TargetedExtraction(_), true) => 0,
        (StrategyClass::TargetedExtraction(_), false) => 3,
        (StrategyClass::Stall, false) => 0,
        (_, false) => 1,
    }
}

/// Missing targetable kinds that have not been asked for too often.
pub fn eligible_targets(
    intelligence: &ExtractedIntelligence,
    attempts: &BTreeMap<EntityKind, u32>,
) -> Vec<EntityKind> {
    intelligence
        .missing_kinds()
        .into_iter()
        .filter(|kind| attempts.get(kind).copied().unwrap_or(0) < MAX_TARGET_ATTEMPTS)
        .collect()
}

/// Entity kinds hinted at by the counterpart's wording.
pub fn cued_kinds(text: &str) -> Vec<EntityKind> {
    let lower = text.to_lowercase();
    CUES.iter()
        .filter(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(kind, _)| *kind)
        .collect()
}

fn pick<R: Rng + ?Sized>(variants: &'static [&'static str], rng: &mut R) -> &'static str {
    variants.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Fixture {
        intelligence: ExtractedIntelligence,
        attempts: BTreeMap<EntityKind, u32>,
        recent: Vec<StrategyClass>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                intelligence: ExtractedIntelligence::default(),
                attempts: BTreeMap::new(),
                recent: Vec::new(),
            }
        }

        fn ctx<'a>(&'a self, persona: Persona, turn: usize, text: &'a str) -> StrategyContext<'a> {
            StrategyContext {
                persona,
                counterpart_turn: turn,
                text,
                intelligence: &self.intelligence,
                attempts: &self.attempts,
                recent: &self.recent,
            }
        }
    }

    #[test]
    fn test_rapport_prefers_clarifying() {
        let engine = StrategyEngine::new(3);
        let fixture = Fixture::new();
        let mut rng = StdRng::seed_from_u64(7);
        let chosen = engine.select(&fixture.ctx(Persona::Curious, 1, "hello"), &mut rng);
        assert_eq!(chosen, StrategyClass::AskClarifyingQuestion);
    }

    #[test]
    fn test_rapport_cue_promotes_targeted() {
        let engine = StrategyEngine::new(3);
        let fixture = Fixture::new();
        let mut rng = StdRng::seed_from_u64(7);
        let chosen = engine.select(
            &fixture.ctx(Persona::Cooperative, 1, "Pay the fee on UPI now"),
            &mut rng,
        );
        assert_eq!(chosen, StrategyClass::TargetedExtraction(EntityKind::UpiId));
    }

    #[test]
    fn test_extraction_phase_prefers_targeted() {
        let engine = StrategyEngine::new(3);
        let fixture = Fixture::new();
        let mut rng = StdRng::seed_from_u64(1);
        let chosen = engine.select(&fixture.ctx(Persona::Skeptical, 3, "ok"), &mut rng);
        assert!(chosen.target().is_some(), "{}", chosen);
    }

    #[test]
    fn test_most_recent_class_excluded() {
        let engine = StrategyEngine::new(3);
        let mut fixture = Fixture::new();
        fixture.recent = vec![StrategyClass::TargetedExtraction(EntityKind::UpiId)];
        let scored = engine.score(&fixture.ctx(Persona::Cooperative, 4, "send on upi"));
        assert!(scored.iter().all(|(class, _)| class.target().is_none()));
    }

    #[test]
    fn test_older_window_entries_penalize() {
        let engine = StrategyEngine::new(3);
        let mut fixture = Fixture::new();
        fixture.recent = vec![StrategyClass::AskClarifyingQuestion, StrategyClass::Stall];
        let scored = engine.score(&fixture.ctx(Persona::Curious, 1, "hello"));
        let clarify = scored
            .iter()
            .find(|(c, _)| *c == StrategyClass::AskClarifyingQuestion)
            .map(|(_, s)| *s);
        // base 3 + affinity 1 - one older repeat
        assert_eq!(clarify, Some(3));
        assert!(!scored.iter().any(|(c, _)| *c == StrategyClass::Stall));
    }

    #[test]
    fn test_entries_outside_window_ignored() {
        let engine = StrategyEngine::new(2);
        let mut fixture = Fixture::new();
        fixture.recent = vec![
            StrategyClass::AskClarifyingQuestion,
            StrategyClass::ExpressConcern,
            StrategyClass::Stall,
        ];
        let scored = engine.score(&fixture.ctx(Persona::Curious, 1, "hello"));
        let clarify = scored
            .iter()
            .find(|(c, _)| *c == StrategyClass::AskClarifyingQuestion)
            .map(|(_, s)| *s);
        assert_eq!(clarify, Some(4));
    }

    #[test]
    fn test_exhausted_or_captured_kinds_not_targeted() {
        let mut fixture = Fixture::new();
        fixture.intelligence.upi_ids.insert("winner@paytm".into());
        fixture.attempts.insert(EntityKind::PhoneNumber, MAX_TARGET_ATTEMPTS);
        let targets = eligible_targets(&fixture.intelligence, &fixture.attempts);
        assert_eq!(targets, vec![EntityKind::BankAccount, EntityKind::PhishingLink]);
    }

    #[test]
    fn test_selection_is_deterministic_for_seed() {
        let engine = StrategyEngine::new(3);
        let fixture = Fixture::new();
        let ctx = fixture.ctx(Persona::Confused, 5, "whatever");
        let a = engine.select(&ctx, &mut StdRng::seed_from_u64(42));
        let b = engine.select(&ctx, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        let text_a = engine.render(Persona::Confused, a, &mut StdRng::seed_from_u64(9));
        let text_b = engine.render(Persona::Confused, b, &mut StdRng::seed_from_u64(9));
        assert_eq!(text_a, text_b);
    }

    #[test]
    fn test_render_targeted_asks_for_kind() {
        let engine = StrategyEngine::new(3);
        let mut rng = StdRng::seed_from_u64(3);
        let reply = engine.render(
            Persona::Confused,
            StrategyClass::TargetedExtraction(EntityKind::UpiId),
            &mut rng,
        );
        assert!(reply.contains("UPI ID"), "{}", reply);
    }

    #[test]
    fn test_cued_kinds() {
        assert_eq!(
            cued_kinds("Click the link and call me"),
            vec![EntityKind::PhoneNumber, EntityKind::PhishingLink]
        );
        assert!(cued_kinds("hello there").is_empty());
    }
}
