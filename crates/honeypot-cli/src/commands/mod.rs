pub mod classify;
pub mod replay;

use anyhow::{Context, Result};
use honeypot_core::config::HoneypotConfig;
use honeypot_infrastructure::ConfigService;
use std::path::Path;

/// Loads configuration from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<HoneypotConfig> {
    let service = match path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    service.get_config().context("Failed to load configuration")
}
