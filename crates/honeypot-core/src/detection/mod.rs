//! Scam intent detection.
//!
//! # Module Structure
//!
//! - `model`: `DetectionResult` and confidence bands
//! - `detector`: The catalog-driven classifier
//!
//! # Usage
//!
//! ```ignore
//! use honeypot_core::detection::Detector;
//!
//! let detector = Detector::new(catalog.clone());
//! let result = detector.classify("Share the OTP now", &session.turns);
//! ```

mod detector;
mod model;

pub use detector::Detector;
pub use model::{CONFIDENCE_CAP, ConfidenceBand, DetectionResult, MEDIUM_BAND_FLOOR};
