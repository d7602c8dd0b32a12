//! Application layer for the honeypot engine.
//!
//! This crate provides the use cases that coordinate the domain engine with
//! concurrent callers and the report delivery boundary.

pub mod dispatch;
pub mod request;
pub mod session;
pub mod session_usecase;

pub use dispatch::RetryingDispatcher;
pub use request::{TurnRequest, TurnResponse};
pub use session_usecase::SessionUseCase;
