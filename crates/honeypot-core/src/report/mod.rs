//! Final report module.
//!
//! # Module Structure
//!
//! - `model`: `ReportPayload` wire type
//! - `dispatcher`: `ReportDispatcher` trait and `DeliveryOutcome`
//!
//! # Usage
//!
//! ```ignore
//! use honeypot_core::report::{ReportDispatcher, ReportPayload};
//!
//! let payload = ReportPayload::from_session(&session, config.detection.engagement_threshold);
//! dispatcher.deliver(&payload).await?;
//! ```

mod dispatcher;
mod model;

pub use dispatcher::{DeliveryOutcome, ReportDispatcher};
pub use model::ReportPayload;
