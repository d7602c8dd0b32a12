//! Session module.
//!
//! # Module Structure
//!
//! - `message`: Inbound/outbound message types and channel metadata
//! - `model`: `Session` aggregate, `Turn`, `SessionState`, `SessionSnapshot`
//! - `engine`: `HoneypotEngine` turn processing and completion policy
//! - `notes`: Agent notes attached to reports
//!
//! # Usage
//!
//! ```ignore
//! use honeypot_core::session::{HoneypotEngine, Message, MessageMetadata};
//!
//! let mut session = engine.open_session("abc", MessageMetadata::default(), &[]);
//! let outcome = engine.process_turn(&mut session, Message::counterpart(text, ts), &mut rng);
//! ```

mod engine;
mod message;
mod model;
mod notes;

pub use engine::{CompletionClaim, HoneypotEngine, TurnOutcome};
pub use message::{Message, MessageMetadata, SenderRole};
pub use model::{Session, SessionSnapshot, SessionState, Turn};
pub use notes::agent_notes;
