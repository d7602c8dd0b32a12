//! Session domain model.
//!
//! A `Session` is the per-conversation aggregate: the append-only turn log,
//! cumulative confidence, the sticky persona, harvested intelligence, and the
//! report delivery flags. It is mutated only by the turn engine.

use super::message::{Message, MessageMetadata};
use crate::catalog::{EntityKind, ScamCategory};
use crate::detection::DetectionResult;
use crate::intelligence::{ExtractedIntelligence, Extraction, LinkFlag};
use crate::persona::{Persona, StrategyClass};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use strum::Display;

/// Lifecycle of a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// No engagement yet; replies are neutral.
    #[default]
    New,
    /// Confidence cleared the threshold; a persona is assigned.
    Engaged,
    /// Completion policy fired or completion was forced.
    Complete,
}

/// One recorded message and the detection computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Position in the session's turn log.
    pub index: usize,
    pub message: Message,
    /// `DetectionResult::none()` for agent turns.
    pub detection: DetectionResult,
    /// Strategy that produced an agent reply.
    pub strategy: Option<StrategyClass>,
}

/// Per-conversation aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub state: SessionState,
    pub turns: Vec<Turn>,
    /// Highest confidence observed so far.
    pub confidence: f64,
    pub category: ScamCategory,
    persona: Option<Persona>,
    pub intelligence: ExtractedIntelligence,
    pub link_flags: BTreeMap<String, BTreeSet<LinkFlag>>,
    /// Names of every indicator group that matched during the session.
    pub matched_groups: BTreeSet<String>,
    /// Recently used strategies, oldest first, bounded by the recency window.
    pub recent_strategies: Vec<StrategyClass>,
    /// Number of targeted prompts issued per entity kind.
    pub extraction_attempts: BTreeMap<EntityKind, u32>,
    pub metadata: MessageMetadata,
    /// Counterpart turn on which the session engaged.
    pub engaged_at_turn: Option<usize>,
    /// Set only after a confirmed delivery.
    pub report_sent: bool,
    /// Set while a report delivery is outstanding.
    pub dispatch_in_flight: bool,
    pub agent_notes: String,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>, metadata: MessageMetadata) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            state: SessionState::New,
            turns: Vec::new(),
            confidence: 0.0,
            category: ScamCategory::Unknown,
            persona: None,
            intelligence: ExtractedIntelligence::default(),
            link_flags: BTreeMap::new(),
            matched_groups: BTreeSet::new(),
            recent_strategies: Vec::new(),
            extraction_attempts: BTreeMap::new(),
            metadata,
            engaged_at_turn: None,
            report_sent: false,
            dispatch_in_flight: false,
            agent_notes: String::new(),
            created_at: now,
            last_active_at: now,
        }
    }

    pub fn persona(&self) -> Option<Persona> {
        self.persona
    }

    /// Assigns the persona on first engagement. Later calls keep the
    /// original assignment and return it.
    pub fn assign_persona(&mut self, persona: Persona) -> Persona {
        *self.persona.get_or_insert(persona)
    }

    /// Number of counterpart turns recorded.
    pub fn counterpart_turns(&self) -> usize {
        self.turns.iter().filter(|t| t.message.is_counterpart()).count()
    }

    /// Number of messages in either direction.
    pub fn total_messages(&self) -> usize {
        self.turns.len()
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// Appends a scored counterpart turn and folds its results into the
    /// aggregate.
    pub fn record_counterpart(
        &mut self,
        message: Message,
        detection: DetectionResult,
        extraction: Extraction,
    ) {
        if detection.is_match() && detection.confidence >= self.confidence {
            self.category = detection.category;
        }
        self.confidence = self.confidence.max(detection.confidence);
        self.matched_groups
            .extend(detection.matched_categories.iter().cloned());
        self.intelligence.merge(&extraction.intelligence);
        for (link, flags) in extraction.link_flags {
            self.link_flags.entry(link).or_default().extend(flags);
        }
        self.push_turn(message, detection, None);
    }

    /// Appends an agent turn. Agent text is never scored.
    pub fn record_agent(&mut self, message: Message, strategy: Option<StrategyClass>) {
        self.push_turn(message, DetectionResult::none(), strategy);
    }

    /// Remembers a used strategy, keeping at most `window` entries.
    pub fn remember_strategy(&mut self, strategy: StrategyClass, window: usize) {
        if let Some(kind) = strategy.target() {
            *self.extraction_attempts.entry(kind).or_insert(0) += 1;
        }
        self.recent_strategies.push(strategy);
        let excess = self.recent_strategies.len().saturating_sub(window);
        self.recent_strategies.drain(..excess);
    }

    pub fn engagement_duration_secs(&self) -> i64 {
        (self.last_active_at - self.created_at).num_seconds()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            state: self.state,
            turn_count: self.counterpart_turns(),
            total_messages: self.total_messages(),
            confidence: self.confidence,
            category: self.category,
            persona: self.persona,
            intelligence: self.intelligence.clone(),
            completed: self.is_complete(),
            report_sent: self.report_sent,
            agent_notes: self.agent_notes.clone(),
            metadata: self.metadata.clone(),
            created_at: self.created_at,
            last_active_at: self.last_active_at,
            engagement_duration_secs: self.engagement_duration_secs(),
        }
    }

    fn push_turn(&mut self, message: Message, detection: DetectionResult, strategy: Option<StrategyClass>) {
        self.turns.push(Turn {
            index: self.turns.len(),
            message,
            detection,
            strategy,
        });
        self.last_active_at = Utc::now();
    }
}

/// Read-only view of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub state: SessionState,
    /// Counterpart turns.
    pub turn_count: usize,
    pub total_messages: usize,
    pub confidence: f64,
    pub category: ScamCategory,
    pub persona: Option<Persona>,
    pub intelligence: ExtractedIntelligence,
    pub completed: bool,
    pub report_sent: bool,
    pub agent_notes: String,
    pub metadata: MessageMetadata,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
    pub engagement_duration_secs: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(category: ScamCategory, confidence: f64) -> DetectionResult {
        let mut result = DetectionResult::none();
        result.category = category;
        result.confidence = confidence;
        result.matched_terms.insert("upi".into());
        result.matched_categories.insert("upi_fraud".into());
        result
    }

    #[test]
    fn test_persona_is_sticky() {
        let mut session = Session::new("s1", MessageMetadata::default());
        assert_eq!(session.persona(), None);
        assert_eq!(session.assign_persona(Persona::Skeptical), Persona::Skeptical);
        assert_eq!(session.assign_persona(Persona::Curious), Persona::Skeptical);
        assert_eq!(session.persona(), Some(Persona::Skeptical));
    }

    #[test]
    fn test_cumulative_confidence_never_drops() {
        let mut session = Session::new("s1", MessageMetadata::default());
        session.record_counterpart(
            Message::counterpart("a", 1),
            detection(ScamCategory::UpiFraud, 0.7),
            Extraction::default(),
        );
        session.record_counterpart(
            Message::counterpart("b", 2),
            DetectionResult::none(),
            Extraction::default(),
        );
        assert_eq!(session.confidence, 0.7);
        assert_eq!(session.category, ScamCategory::UpiFraud);
        assert_eq!(session.counterpart_turns(), 2);
    }

    #[test]
    fn test_turn_log_is_indexed() {
        let mut session = Session::new("s1", MessageMetadata::default());
        session.record_counterpart(
            Message::counterpart("hi", 1),
            DetectionResult::none(),
            Extraction::default(),
        );
        session.record_agent(Message::agent("who is this?", 2), None);
        assert_eq!(session.total_messages(), 2);
        assert_eq!(session.counterpart_turns(), 1);
        assert_eq!(session.turns[1].index, 1);
        assert!(!session.turns[1].detection.is_match());
    }

    #[test]
    fn test_recent_strategies_bounded() {
        let mut session = Session::new("s1", MessageMetadata::default());
        session.remember_strategy(StrategyClass::Stall, 3);
        session.remember_strategy(StrategyClass::TargetedExtraction(EntityKind::UpiId), 3);
        session.remember_strategy(StrategyClass::RequestProof, 3);
        session.remember_strategy(StrategyClass::ExpressConcern, 3);
        assert_eq!(
            session.recent_strategies,
            vec![
                StrategyClass::TargetedExtraction(EntityKind::UpiId),
                StrategyClass::RequestProof,
                StrategyClass::ExpressConcern
            ]
        );
        assert_eq!(session.extraction_attempts[&EntityKind::UpiId], 1);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let session = Session::new("s1", MessageMetadata::default());
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["sessionId"], "s1");
        assert_eq!(json["state"], "NEW");
        assert_eq!(json["turnCount"], 0);
        assert_eq!(json["completed"], false);
    }
}
