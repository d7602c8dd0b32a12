//! Report delivery boundary.

use super::model::ReportPayload;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Delivers completed-session reports to a downstream evaluator.
///
/// Implementations make a single delivery attempt per call. Failures should be
/// returned as `HoneypotError::transient` when a retry may succeed and
/// `HoneypotError::rejected` otherwise; retry and timeout policy live with
/// the caller.
#[async_trait]
pub trait ReportDispatcher: Send + Sync {
    async fn deliver(&self, report: &ReportPayload) -> Result<()>;
}

/// Result of an out-of-band completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// The report had already been delivered; nothing was sent.
    AlreadyReported,
    /// Another delivery for this session is still running.
    InFlight,
    /// The report was delivered by this call.
    Delivered,
    /// Every attempt failed; a later turn or completion request will retry.
    DeliveryFailed,
}
