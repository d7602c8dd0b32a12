//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the engine configuration
//! from the configuration file (~/.config/honeypot/config.toml), applies
//! `HONEYPOT_*` environment overrides, and validates the result.

use honeypot_core::config::HoneypotConfig;
use honeypot_core::error::{HoneypotError, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, RwLock};

/// Directory under the platform config dir holding the config file.
pub const CONFIG_DIR_NAME: &str = "honeypot";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variables recognized as overrides.
pub const ENV_ENGAGEMENT_THRESHOLD: &str = "HONEYPOT_ENGAGEMENT_THRESHOLD";
pub const ENV_MIN_TURNS: &str = "HONEYPOT_MIN_TURNS";
pub const ENV_MAX_TURNS: &str = "HONEYPOT_MAX_TURNS";
pub const ENV_RECENT_STRATEGY_WINDOW: &str = "HONEYPOT_RECENT_STRATEGY_WINDOW";
pub const ENV_REPORT_ENDPOINT: &str = "HONEYPOT_REPORT_ENDPOINT";
pub const ENV_REPORT_TIMEOUT_SECS: &str = "HONEYPOT_REPORT_TIMEOUT_SECS";
pub const ENV_REPORT_MAX_ATTEMPTS: &str = "HONEYPOT_REPORT_MAX_ATTEMPTS";
pub const ENV_REPORT_BACKOFF_MS: &str = "HONEYPOT_REPORT_BACKOFF_MS";

/// Returns the default config file path (e.g. `~/.config/honeypot/config.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Configuration service that loads and caches the engine configuration.
///
/// A missing file yields the defaults. The cached value is returned until
/// [`ConfigService::invalidate_cache`] is called.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<HoneypotConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService reading the default config path.
    pub fn new() -> Self {
        Self {
            path: default_config_path(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a ConfigService reading an explicit file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Gets the configuration, loading it with process environment overrides
    /// if not cached.
    ///
    /// # Errors
    ///
    /// Returns a config error if the file cannot be parsed, an override is
    /// malformed, or the merged configuration fails validation.
    pub fn get_config(&self) -> Result<HoneypotConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|_| HoneypotError::internal("config cache lock poisoned"))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_with_env(|key| std::env::var(key).ok())?;

        {
            let mut write_lock = self
                .config
                .write()
                .map_err(|_| HoneypotError::internal("config cache lock poisoned"))?;
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    /// Loads the file and applies overrides from `env`, bypassing the cache.
    pub fn load_with_env<F>(&self, env: F) -> Result<HoneypotConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.path {
            Some(path) => load_file(path)?,
            None => {
                tracing::warn!("[ConfigService] No config directory available, using defaults");
                HoneypotConfig::default()
            }
        };
        apply_env_overrides(&mut config, env)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

fn load_file(path: &Path) -> Result<HoneypotConfig> {
    if !path.exists() {
        tracing::debug!(
            "[ConfigService] {} not found, using defaults",
            path.display()
        );
        return Ok(HoneypotConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: HoneypotConfig = toml::from_str(&content).map_err(|e| {
        HoneypotError::config(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    tracing::info!("[ConfigService] Loaded configuration from {}", path.display());
    Ok(config)
}

/// Applies `HONEYPOT_*` overrides looked up through `env`.
pub fn apply_env_overrides<F>(config: &mut HoneypotConfig, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = parse_env(&env, ENV_ENGAGEMENT_THRESHOLD)? {
        config.detection.engagement_threshold = value;
    }
    if let Some(value) = parse_env(&env, ENV_MIN_TURNS)? {
        config.session.min_turns = value;
    }
    if let Some(value) = parse_env(&env, ENV_MAX_TURNS)? {
        config.session.max_turns = value;
    }
    if let Some(value) = parse_env(&env, ENV_RECENT_STRATEGY_WINDOW)? {
        config.session.recent_strategy_window = value;
    }
    if let Some(value) = env(ENV_REPORT_ENDPOINT) {
        let value = value.trim();
        config.report.endpoint = (!value.is_empty()).then(|| value.to_string());
    }
    if let Some(value) = parse_env(&env, ENV_REPORT_TIMEOUT_SECS)? {
        config.report.timeout_secs = value;
    }
    if let Some(value) = parse_env(&env, ENV_REPORT_MAX_ATTEMPTS)? {
        config.report.max_attempts = value;
    }
    if let Some(value) = parse_env(&env, ENV_REPORT_BACKOFF_MS)? {
        config.report.backoff_base_ms = value;
    }
    Ok(())
}

fn parse_env<T, F>(env: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| HoneypotError::config(format!("{}='{}': {}", key, raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = HoneypotConfig::default();
        apply_env_overrides(
            &mut config,
            env_from(&[
                (ENV_ENGAGEMENT_THRESHOLD, "0.7"),
                (ENV_MAX_TURNS, "20"),
                (ENV_REPORT_ENDPOINT, "https://evaluator.example/report"),
            ]),
        )
        .unwrap();
        assert_eq!(config.detection.engagement_threshold, 0.7);
        assert_eq!(config.session.max_turns, 20);
        assert_eq!(
            config.report.endpoint.as_deref(),
            Some("https://evaluator.example/report")
        );
        assert_eq!(config.session.min_turns, 3);
    }

    #[test]
    fn test_malformed_override_is_config_error() {
        let mut config = HoneypotConfig::default();
        let err = apply_env_overrides(&mut config, env_from(&[(ENV_MIN_TURNS, "three")]))
            .unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains(ENV_MIN_TURNS));
    }

    #[test]
    fn test_blank_endpoint_clears() {
        let mut config = HoneypotConfig::default();
        config.report.endpoint = Some("http://x".into());
        apply_env_overrides(&mut config, env_from(&[(ENV_REPORT_ENDPOINT, " ")])).unwrap();
        assert_eq!(config.report.endpoint, None);
    }

    #[test]
    fn test_default_path_ends_with_config_file() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("honeypot/config.toml"));
        }
    }
}
