//! Intelligence extraction module.
//!
//! # Module Structure
//!
//! - `model`: `ExtractedIntelligence` aggregate and link risk flags
//! - `extractor`: Per-kind extraction, validation and normalization
//!
//! # Usage
//!
//! ```ignore
//! use honeypot_core::intelligence::Extractor;
//!
//! let extraction = extractor.extract(text, &detection);
//! session.intelligence.merge(&extraction.intelligence);
//! ```

mod extractor;
mod model;

pub use extractor::Extractor;
pub use model::{ExtractedIntelligence, Extraction, LinkFlag, TARGETABLE_KINDS};
