//! Final report payload.

use crate::intelligence::ExtractedIntelligence;
use crate::session::Session;
use serde::{Deserialize, Serialize};

/// Aggregate delivered to the downstream evaluator when a session completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub session_id: String,
    pub scam_detected: bool,
    pub total_messages_exchanged: usize,
    pub extracted_intelligence: ExtractedIntelligence,
    pub agent_notes: String,
}

impl ReportPayload {
    /// Builds the payload from the session's current aggregate.
    pub fn from_session(session: &Session, engagement_threshold: f64) -> Self {
        Self {
            session_id: session.id.clone(),
            scam_detected: session.confidence >= engagement_threshold,
            total_messages_exchanged: session.total_messages(),
            extracted_intelligence: session.intelligence.clone(),
            agent_notes: session.agent_notes.clone(),
        }
    }
}
