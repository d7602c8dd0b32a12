//! Pattern catalog module.
//!
//! Weighted indicator rules grouped by scam category, plus the extraction
//! rules grouped by entity kind.
//!
//! # Module Structure
//!
//! - `model`: Compiled catalog types (`PatternCatalog`, `IndicatorGroup`, `EntityRules`)
//! - `preset`: The default rule set
//!
//! # Usage
//!
//! ```ignore
//! use honeypot_core::catalog::{default_catalog, PatternCatalog, ScamCategory};
//! ```

mod model;
mod preset;

// Re-export public API
pub use model::{
    EntityKind, EntityRules, EntitySpec, GroupSpec, Indicator, IndicatorGroup, IndicatorSpec,
    PatternCatalog, ScamCategory, VocabularyTerm,
};
pub use preset::{DEFAULT_ENTITIES, DEFAULT_GROUPS, default_catalog};
