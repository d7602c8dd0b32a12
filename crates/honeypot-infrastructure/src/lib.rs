//! Infrastructure layer for the honeypot engine.
//!
//! Configuration loading and report delivery implementations.

pub mod config_service;
pub mod http_dispatcher;
pub mod logging_dispatcher;

pub use config_service::ConfigService;
pub use http_dispatcher::HttpReportDispatcher;
pub use logging_dispatcher::LoggingReportDispatcher;
