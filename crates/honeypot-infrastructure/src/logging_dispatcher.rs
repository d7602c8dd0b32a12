//! Dry-run dispatcher that writes reports to the log instead of the network.

use async_trait::async_trait;
use honeypot_core::error::Result;
use honeypot_core::report::{ReportDispatcher, ReportPayload};
use std::sync::Mutex;

/// Logs every report as JSON and keeps a copy of what it accepted.
#[derive(Debug, Default)]
pub struct LoggingReportDispatcher {
    delivered: Mutex<Vec<ReportPayload>>,
}

impl LoggingReportDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports accepted so far, oldest first.
    pub fn delivered(&self) -> Vec<ReportPayload> {
        self.delivered
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReportDispatcher for LoggingReportDispatcher {
    async fn deliver(&self, report: &ReportPayload) -> Result<()> {
        let json = serde_json::to_string(report)?;
        tracing::info!(
            "[LoggingReportDispatcher] Report for session {} (dry run): {}",
            report.session_id,
            json
        );
        if let Ok(mut reports) = self.delivered.lock() {
            reports.push(report.clone());
        }
        Ok(())
    }
}
