use anyhow::{Context, Result};
use clap::Args;
use honeypot_application::{SessionUseCase, TurnRequest};
use honeypot_core::catalog::default_catalog;
use honeypot_core::config::HoneypotConfig;
use honeypot_core::report::ReportDispatcher;
use honeypot_core::session::{HoneypotEngine, Message};
use honeypot_infrastructure::{HttpReportDispatcher, LoggingReportDispatcher};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON array of messages or full turn requests
    #[arg(long)]
    pub script: PathBuf,

    /// Session ID for entries that do not name one (random if omitted)
    #[arg(long)]
    pub session: Option<String>,

    /// Seed for reproducible replies
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log reports instead of posting them to the configured endpoint
    #[arg(long)]
    pub dry_run: bool,

    /// Force completion of every replayed session after the last turn
    #[arg(long)]
    pub force_complete: bool,
}

/// One line of a replay script.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScriptEntry {
    Request(TurnRequest),
    Text {
        text: String,
        #[serde(default)]
        timestamp: i64,
    },
}

impl ScriptEntry {
    fn into_request(self, default_session: &str) -> TurnRequest {
        match self {
            Self::Request(request) => request,
            Self::Text { text, timestamp } => {
                TurnRequest::new(default_session, Message::counterpart(text, timestamp))
            }
        }
    }
}

fn load_script(path: &Path) -> Result<Vec<ScriptEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse script {}", path.display()))
}

fn build_dispatcher(config: &HoneypotConfig, dry_run: bool) -> Result<Arc<dyn ReportDispatcher>> {
    if !dry_run {
        if let Some(http) = HttpReportDispatcher::from_config(&config.report)? {
            tracing::info!("[Replay] Reports go to {}", http.endpoint());
            return Ok(Arc::new(http));
        }
    }
    tracing::info!("[Replay] No report endpoint in use, logging reports only");
    Ok(Arc::new(LoggingReportDispatcher::new()))
}

pub async fn run(config: HoneypotConfig, args: ReplayArgs) -> Result<()> {
    let entries = load_script(&args.script)?;
    let dispatcher = build_dispatcher(&config, args.dry_run)?;
    let catalog = Arc::new(default_catalog().context("Failed to compile pattern catalog")?);
    let engine = Arc::new(HoneypotEngine::new(Arc::new(config), catalog));
    let usecase = match args.seed {
        Some(seed) => SessionUseCase::with_seed(engine, dispatcher, seed),
        None => SessionUseCase::new(engine, dispatcher),
    };

    let default_session = args
        .session
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let mut sessions: Vec<String> = Vec::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let request = entry.into_request(&default_session);
        let session_id = request.session_id.clone();
        println!("[{}] > {}", session_id, request.message.text);

        let response = usecase
            .ingest(request)
            .await
            .with_context(|| format!("Turn {} was rejected", index + 1))?;
        println!("[{}] < {}", session_id, response.reply);

        if !sessions.contains(&session_id) {
            sessions.push(session_id);
        }
    }

    if args.force_complete {
        for session_id in &sessions {
            let outcome = usecase.force_complete(session_id).await?;
            tracing::info!("[Replay] Session {} force-completed: {:?}", session_id, outcome);
        }
    }

    usecase.wait_for_dispatches().await;

    for session_id in &sessions {
        let snapshot = usecase.snapshot(session_id).await?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_accepts_plain_and_full_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("script.json");
        std::fs::write(
            &path,
            r#"[
                {"text": "Congratulations! You won a prize"},
                {"sessionId": "other", "message": {"sender": "scammer", "text": "Pay the fee", "timestamp": 5}}
            ]"#,
        )
        .unwrap();

        let requests: Vec<TurnRequest> = load_script(&path)
            .unwrap()
            .into_iter()
            .map(|entry| entry.into_request("default"))
            .collect();

        assert_eq!(requests[0].session_id, "default");
        assert!(requests[0].message.is_counterpart());
        assert_eq!(requests[1].session_id, "other");
        assert_eq!(requests[1].message.timestamp, 5);
    }

    #[test]
    fn test_dry_run_ignores_endpoint() {
        let mut config = HoneypotConfig::default();
        config.report.endpoint = Some("not a url".into());
        assert!(build_dispatcher(&config, true).is_ok());
        assert!(build_dispatcher(&config, false).is_err());
    }

    #[test]
    fn test_missing_script_reports_path() {
        let err = load_script(Path::new("/nonexistent/script.json")).unwrap_err();
        assert!(err.to_string().contains("script.json"));
    }
}
