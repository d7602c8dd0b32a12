//! Core domain of the honeypot engine: scam detection, intelligence
//! extraction, persona-driven replies and the per-session state machine.

pub mod catalog;
pub mod config;
pub mod detection;
pub mod error;
pub mod intelligence;
pub mod persona;
pub mod report;
pub mod session;

pub use error::{HoneypotError, Result};
