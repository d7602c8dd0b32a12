//! Persona and reply strategy module.
//!
//! A persona is assigned once per session when it first engages; every
//! engaged reply is then produced by scoring strategy classes and phrasing
//! the winner from the persona's templates.
//!
//! # Module Structure
//!
//! - `model`: `Persona` and `StrategyClass`
//! - `preset`: Reply templates
//! - `strategy`: `StrategyEngine` selection and rendering
//!
//! # Usage
//!
//! ```ignore
//! use honeypot_core::persona::{Persona, StrategyEngine};
//!
//! let persona = Persona::for_category(detection.category);
//! let class = engine.select(&ctx, &mut rng);
//! let reply = engine.render(persona, class, &mut rng);
//! ```

mod model;
mod preset;
mod strategy;

pub use model::{Persona, StrategyClass};
pub use preset::{CLOSING_REPLIES, NEUTRAL_REPLIES, all_templates};
pub use strategy::{
    MAX_TARGET_ATTEMPTS, RAPPORT_TURNS, StrategyContext, StrategyEngine, cued_kinds,
    eligible_targets,
};
