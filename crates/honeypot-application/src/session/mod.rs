//! Session application services.
//!
//! This module holds the in-memory registry that owns live sessions and the
//! per-session locks that serialize turn ingestion.

mod registry;

pub use registry::{SessionHandle, SessionRegistry};
