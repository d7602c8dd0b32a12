//! Engine configuration model.
//!
//! Loaded once at startup (see `honeypot-infrastructure::ConfigService`) and
//! shared read-only across all session handlers.

use crate::error::{HoneypotError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration consumed by the engine and the dispatch layer.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct HoneypotConfig {
    pub detection: DetectionConfig,
    pub session: SessionConfig,
    pub report: ReportConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum cumulative confidence before the persona engine replies.
    pub engagement_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            engagement_threshold: 0.6,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Counterpart turns required before the completion policy may fire.
    pub min_turns: u32,
    /// Counterpart turns after which a session is forced to complete.
    pub max_turns: u32,
    /// Size of the recently-used strategy window.
    pub recent_strategy_window: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_turns: 3,
            max_turns: 15,
            recent_strategy_window: 3,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Downstream evaluator endpoint. `None` means reports are only logged.
    pub endpoint: Option<String>,
    /// Per-attempt timeout.
    pub timeout_secs: u64,
    /// Total delivery attempts, including the first.
    pub max_attempts: u32,
    /// Backoff before the second attempt; doubles on each further attempt.
    pub backoff_base_ms: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 10,
            max_attempts: 3,
            backoff_base_ms: 500,
        }
    }
}

impl ReportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delay before attempt `attempt` (1-based). The first attempt is immediate.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 2u64.saturating_pow(attempt.saturating_sub(2).min(16));
        Duration::from_millis(self.backoff_base_ms.saturating_mul(factor))
    }
}

impl HoneypotConfig {
    /// Checks cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.detection.engagement_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(HoneypotError::config(format!(
                "engagement_threshold must be in (0, 1], got {}",
                threshold
            )));
        }
        if self.session.min_turns == 0 {
            return Err(HoneypotError::config("min_turns must be at least 1"));
        }
        if self.session.min_turns > self.session.max_turns {
            return Err(HoneypotError::config(format!(
                "min_turns ({}) exceeds max_turns ({})",
                self.session.min_turns, self.session.max_turns
            )));
        }
        if self.session.recent_strategy_window == 0 {
            return Err(HoneypotError::config(
                "recent_strategy_window must be at least 1",
            ));
        }
        if self.report.max_attempts == 0 {
            return Err(HoneypotError::config("max_attempts must be at least 1"));
        }
        if self.report.timeout_secs == 0 {
            return Err(HoneypotError::config("timeout_secs must be at least 1"));
        }
        Ok(())
    }
}
