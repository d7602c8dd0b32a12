//! Session state machine.
//!
//! `HoneypotEngine` ties detection, extraction and strategy selection
//! together for one inbound message at a time. It is synchronous and holds no
//! per-session state; callers own the `Session` and serialize access to it.
//!
//! # State transitions
//!
//! ```text
//! NEW ──(confidence >= threshold)──▶ ENGAGED ──(completion policy)──▶ COMPLETE
//!  │                                                                     ▲
//!  └──────────────(turn cap reached / forced completion)─────────────────┘
//! ```
//!
//! COMPLETE is terminal for engagement: later turns are still recorded but
//! get a closing reply and no strategy.
//!
//! Report claims are at-most-once: a claim sets `dispatch_in_flight`, and only
//! a confirmed delivery sets `report_sent`. A failed delivery clears the
//! in-flight marker so the next turn or completion request claims again.

use super::message::{Message, MessageMetadata, SenderRole};
use super::model::{Session, SessionState};
use super::notes::agent_notes;
use crate::catalog::PatternCatalog;
use crate::config::HoneypotConfig;
use crate::detection::Detector;
use crate::intelligence::Extractor;
use crate::persona::{Persona, StrategyContext, StrategyEngine};
use crate::report::ReportPayload;
use rand::Rng;
use std::sync::Arc;

/// Result of ingesting one counterpart message.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub reply: String,
    pub state: SessionState,
    /// A claimed report that the caller must deliver and then settle with
    /// [`HoneypotEngine::settle_dispatch`].
    pub report: Option<ReportPayload>,
}

/// Result of a forced completion on the engine side.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionClaim {
    AlreadyReported,
    InFlight,
    /// The caller must deliver this report and settle the dispatch.
    Dispatch(ReportPayload),
}

/// Turn-processing engine shared by all sessions.
#[derive(Debug, Clone)]
pub struct HoneypotEngine {
    config: Arc<HoneypotConfig>,
    catalog: Arc<PatternCatalog>,
    detector: Detector,
    extractor: Extractor,
    strategy: StrategyEngine,
}

impl HoneypotEngine {
    pub fn new(config: Arc<HoneypotConfig>, catalog: Arc<PatternCatalog>) -> Self {
        Self {
            detector: Detector::new(catalog.clone()),
            extractor: Extractor::new(catalog.clone()),
            strategy: StrategyEngine::new(config.session.recent_strategy_window),
            config,
            catalog,
        }
    }

    pub fn config(&self) -> &HoneypotConfig {
        &self.config
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    fn threshold(&self) -> f64 {
        self.config.detection.engagement_threshold
    }

    /// Creates a session, importing any prior conversation as turns.
    ///
    /// Counterpart history messages are scored and extracted like live ones,
    /// but produce no replies. Agent history messages are recorded unscored.
    pub fn open_session(
        &self,
        session_id: impl Into<String>,
        metadata: MessageMetadata,
        history: &[Message],
    ) -> Session {
        let mut session = Session::new(session_id, metadata);
        for message in history {
            match message.sender {
                SenderRole::Counterpart => self.ingest_counterpart(&mut session, message.clone()),
                SenderRole::Agent => session.record_agent(message.clone(), None),
            }
        }
        if !history.is_empty() {
            tracing::debug!(
                "[HoneypotEngine] Session {} hydrated with {} history message(s), confidence {:.3}",
                session.id,
                history.len(),
                session.confidence
            );
        }
        session
    }

    /// Processes one inbound counterpart message and produces the reply.
    pub fn process_turn<R: Rng + ?Sized>(
        &self,
        session: &mut Session,
        message: Message,
        rng: &mut R,
    ) -> TurnOutcome {
        let timestamp = message.timestamp;
        let text = message.text.clone();
        self.ingest_counterpart(session, message);

        if session.state == SessionState::New && session.confidence >= self.threshold() {
            let persona = session.assign_persona(Persona::for_category(session.category));
            session.state = SessionState::Engaged;
            session.engaged_at_turn = Some(session.counterpart_turns());
            tracing::info!(
                "[HoneypotEngine] Session {} engaged: category={} confidence={:.3} persona={}",
                session.id,
                session.category,
                session.confidence,
                persona
            );
        }

        let (reply, strategy) = match (session.state, session.persona()) {
            (SessionState::Complete, _) => (self.strategy.closing_reply(rng), None),
            (SessionState::Engaged, Some(persona)) => {
                let ctx = StrategyContext {
                    persona,
                    counterpart_turn: session.counterpart_turns(),
                    text: &text,
                    intelligence: &session.intelligence,
                    attempts: &session.extraction_attempts,
                    recent: &session.recent_strategies,
                };
                let class = self.strategy.select(&ctx, rng);
                let reply = self.strategy.render(persona, class, rng);
                session.remember_strategy(class, self.strategy.recent_window());
                (reply, Some(class))
            }
            _ => (self.strategy.neutral_reply(rng), None),
        };
        session.record_agent(Message::agent(reply.clone(), timestamp), strategy);

        self.evaluate_completion(session);
        let report = self.claim_report(session);

        TurnOutcome {
            reply,
            state: session.state,
            report,
        }
    }

    /// Marks the session complete out of band and claims its report.
    ///
    /// Calling this on an already reported session changes nothing.
    pub fn force_complete(&self, session: &mut Session) -> CompletionClaim {
        if session.state != SessionState::Complete {
            tracing::info!(
                "[HoneypotEngine] Session {} completion forced after {} counterpart turn(s)",
                session.id,
                session.counterpart_turns()
            );
            session.state = SessionState::Complete;
        }
        if session.report_sent {
            return CompletionClaim::AlreadyReported;
        }
        match self.claim_report(session) {
            Some(report) => CompletionClaim::Dispatch(report),
            None => CompletionClaim::InFlight,
        }
    }

    /// Records the outcome of a claimed dispatch.
    pub fn settle_dispatch(&self, session: &mut Session, delivered: bool) {
        session.dispatch_in_flight = false;
        if delivered {
            session.report_sent = true;
            tracing::info!("[HoneypotEngine] Report for session {} delivered", session.id);
        } else {
            tracing::warn!(
                "[HoneypotEngine] Report for session {} not delivered; will retry on next activity",
                session.id
            );
        }
    }

    /// True if the regular completion policy is satisfied.
    pub fn completion_due(&self, session: &Session) -> bool {
        session.confidence >= self.threshold()
            && session.counterpart_turns() >= self.config.session.min_turns as usize
            && session.intelligence.has_intelligence()
            && !session.report_sent
    }

    fn ingest_counterpart(&self, session: &mut Session, message: Message) {
        let detection = self.detector.classify(&message.text, &session.turns);
        let extraction = self.extractor.extract(&message.text, &detection);
        session.record_counterpart(message, detection, extraction);
    }

    fn evaluate_completion(&self, session: &mut Session) {
        if session.state == SessionState::Complete {
            return;
        }
        if session.state == SessionState::Engaged && self.completion_due(session) {
            session.state = SessionState::Complete;
            tracing::info!(
                "[HoneypotEngine] Session {} complete: {} after {} counterpart turn(s)",
                session.id,
                session.intelligence.summary(),
                session.counterpart_turns()
            );
        } else if session.counterpart_turns() >= self.config.session.max_turns as usize {
            session.state = SessionState::Complete;
            tracing::info!(
                "[HoneypotEngine] Session {} reached the {} turn cap",
                session.id,
                self.config.session.max_turns
            );
        }
    }

    /// Claims the report of a complete, unreported session with no delivery
    /// outstanding.
    fn claim_report(&self, session: &mut Session) -> Option<ReportPayload> {
        if session.state != SessionState::Complete
            || session.report_sent
            || session.dispatch_in_flight
        {
            return None;
        }
        session.agent_notes = agent_notes(session, &self.catalog);
        session.dispatch_in_flight = true;
        Some(ReportPayload::from_session(session, self.threshold()))
    }
}
