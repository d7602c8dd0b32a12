use anyhow::{Context, Result};
use honeypot_core::catalog::default_catalog;
use honeypot_core::config::HoneypotConfig;
use honeypot_core::detection::Detector;
use honeypot_core::intelligence::Extractor;
use serde_json::json;
use std::sync::Arc;

pub fn run(config: &HoneypotConfig, text: &str) -> Result<()> {
    let catalog = Arc::new(default_catalog().context("Failed to compile pattern catalog")?);
    let detection = Detector::new(catalog.clone()).classify(text, &[]);
    let extraction = Extractor::new(catalog).extract(text, &detection);

    let output = json!({
        "detection": detection,
        "band": detection.band(config.detection.engagement_threshold),
        "extraction": extraction,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
