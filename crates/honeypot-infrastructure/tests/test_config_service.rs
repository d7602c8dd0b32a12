use honeypot_infrastructure::ConfigService;
use honeypot_infrastructure::config_service::{ENV_MIN_TURNS, ENV_REPORT_ENDPOINT};
use std::fs;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_loads_values_from_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[detection]
engagement_threshold = 0.7

[session]
min_turns = 2
max_turns = 10

[report]
endpoint = "https://evaluator.example/api/report"
max_attempts = 5
"#,
    )
    .unwrap();

    let service = ConfigService::with_path(&path);
    let config = service.load_with_env(no_env).unwrap();

    assert_eq!(config.detection.engagement_threshold, 0.7);
    assert_eq!(config.session.min_turns, 2);
    assert_eq!(config.session.max_turns, 10);
    assert_eq!(config.session.recent_strategy_window, 3);
    assert_eq!(
        config.report.endpoint.as_deref(),
        Some("https://evaluator.example/api/report")
    );
    assert_eq!(config.report.max_attempts, 5);
}

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let service = ConfigService::with_path(temp_dir.path().join("absent.toml"));

    let config = service.load_with_env(no_env).unwrap();
    assert_eq!(config, Default::default());
}

#[test]
fn test_env_overrides_win_over_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[session]\nmin_turns = 2\n").unwrap();

    let service = ConfigService::with_path(&path);
    let config = service
        .load_with_env(|key| match key {
            k if k == ENV_MIN_TURNS => Some("4".to_string()),
            k if k == ENV_REPORT_ENDPOINT => Some("http://localhost:9000/report".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.session.min_turns, 4);
    assert_eq!(
        config.report.endpoint.as_deref(),
        Some("http://localhost:9000/report")
    );
}

#[test]
fn test_invalid_file_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[session]\nmin_turns = 9\nmax_turns = 4\n").unwrap();

    let err = ConfigService::with_path(&path)
        .load_with_env(no_env)
        .unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_unparseable_file_is_config_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[session\nmin_turns = ").unwrap();

    let err = ConfigService::with_path(&path)
        .load_with_env(no_env)
        .unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_cache_until_invalidated() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[report]\nbackoff_base_ms = 100\n").unwrap();

    let service = ConfigService::with_path(&path);
    let first = service.get_config().unwrap();

    fs::write(&path, "[report]\nbackoff_base_ms = 250\n").unwrap();
    assert_eq!(service.get_config().unwrap(), first);

    service.invalidate_cache();
    let reloaded = service.get_config().unwrap();
    assert_ne!(reloaded.report.backoff_base_ms, first.report.backoff_base_ms);
}
