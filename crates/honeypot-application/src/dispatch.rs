//! Report delivery with a bounded retry policy.

use async_trait::async_trait;
use honeypot_core::config::ReportConfig;
use honeypot_core::error::{HoneypotError, Result};
use honeypot_core::report::{ReportDispatcher, ReportPayload};
use std::sync::Arc;

/// Wraps a dispatcher with per-attempt timeouts and exponential backoff.
///
/// Each attempt is bounded by `timeout_secs`. Retryable failures (timeouts,
/// transient transport errors) are retried up to `max_attempts` total, sleeping
/// `backoff_base_ms * 2^(n-2)` before attempt `n`. A non-retryable failure
/// stops immediately.
pub struct RetryingDispatcher {
    inner: Arc<dyn ReportDispatcher>,
    policy: ReportConfig,
}

impl RetryingDispatcher {
    pub fn new(inner: Arc<dyn ReportDispatcher>, policy: ReportConfig) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &ReportConfig {
        &self.policy
    }
}

#[async_trait]
impl ReportDispatcher for RetryingDispatcher {
    async fn deliver(&self, report: &ReportPayload) -> Result<()> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = HoneypotError::internal("no delivery attempt made");

        for attempt in 1..=max_attempts {
            let delay = self.policy.backoff_for(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let result = tokio::time::timeout(self.policy.timeout(), self.inner.deliver(report))
                .await
                .unwrap_or_else(|_| {
                    Err(HoneypotError::transient(format!(
                        "delivery timed out after {}s",
                        self.policy.timeout_secs
                    )))
                });

            match result {
                Ok(()) => {
                    tracing::debug!(
                        "[Dispatch] Report for session {} accepted on attempt {}",
                        report.session_id,
                        attempt
                    );
                    return Ok(());
                }
                Err(e) if !e.is_retryable() => {
                    tracing::error!(
                        "[Dispatch] Report for session {} rejected: {}",
                        report.session_id,
                        e
                    );
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(
                        "[Dispatch] Attempt {}/{} for session {} failed: {}",
                        attempt,
                        max_attempts,
                        report.session_id,
                        e
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
