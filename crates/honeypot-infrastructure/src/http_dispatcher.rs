//! HTTP delivery of final reports.

use async_trait::async_trait;
use honeypot_core::config::ReportConfig;
use honeypot_core::error::{HoneypotError, Result};
use honeypot_core::report::{ReportDispatcher, ReportPayload};
use reqwest::{Client, StatusCode};

/// Posts each report as JSON to the configured evaluator endpoint.
///
/// One call is one attempt. Retries and per-attempt timeouts are applied by
/// the caller; the client timeout here only guards against a hung socket.
#[derive(Debug, Clone)]
pub struct HttpReportDispatcher {
    client: Client,
    endpoint: String,
}

impl HttpReportDispatcher {
    pub fn new(endpoint: impl Into<String>, config: &ReportConfig) -> Result<Self> {
        let endpoint = endpoint.into();
        url::Url::parse(&endpoint)
            .map_err(|e| HoneypotError::config(format!("Invalid report endpoint '{}': {}", endpoint, e)))?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| HoneypotError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, endpoint })
    }

    /// Builds a dispatcher from the configured endpoint, if one is set.
    pub fn from_config(config: &ReportConfig) -> Result<Option<Self>> {
        config
            .endpoint
            .as_deref()
            .map(|endpoint| Self::new(endpoint, config))
            .transpose()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReportDispatcher for HttpReportDispatcher {
    async fn deliver(&self, report: &ReportPayload) -> Result<()> {
        tracing::debug!(
            "[HttpReportDispatcher] POST {} (session {})",
            self.endpoint,
            report.session_id
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(report)
            .send()
            .await
            .map_err(|err| {
                let message = format!("Report request failed: {err}");
                if err.is_connect() || err.is_timeout() {
                    HoneypotError::transient(message)
                } else {
                    HoneypotError::rejected(message)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read evaluator error body".to_string());
        Err(map_http_error(status, body))
    }
}

fn map_http_error(status: StatusCode, body: String) -> HoneypotError {
    let message = format!("Evaluator returned {}: {}", status.as_u16(), body.trim());
    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    if is_retryable {
        HoneypotError::transient(message)
    } else {
        HoneypotError::rejected(message)
    }
}
