//! Error types for the honeypot engine.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for the entire honeypot workspace.
///
/// Detection and extraction never fail: an absence of indicators is a valid
/// zero/empty result. Errors only arise at the edges (configuration, session
/// lookup, report delivery).
#[derive(Error, Debug, Clone, Serialize)]
pub enum HoneypotError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Malformed or missing input, rejected before any session mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report delivery failure
    #[error("Dispatch error: {message}")]
    Dispatch { message: String, retryable: bool },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HoneypotError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a retryable Dispatch error (timeouts, 5xx, connection resets)
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Dispatch {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable Dispatch error (4xx, malformed endpoint)
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Dispatch {
            message: message.into(),
            retryable: false,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if a failed operation may succeed when attempted again.
    ///
    /// Only dispatch failures flagged as transient and IO errors qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Dispatch { retryable, .. } => *retryable,
            Self::Io { .. } => true,
            _ => false,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for HoneypotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for HoneypotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for HoneypotError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for HoneypotError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<regex::Error> for HoneypotError {
    fn from(err: regex::Error) -> Self {
        Self::Config(format!("invalid pattern: {}", err))
    }
}

/// Conversion from anyhow::Error (used by collaborator crates at the boundary)
impl From<anyhow::Error> for HoneypotError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, HoneypotError>`.
pub type Result<T> = std::result::Result<T, HoneypotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = HoneypotError::not_found("Session", "sess-1");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Entity not found: Session 'sess-1'");
    }

    #[test]
    fn test_dispatch_retryability() {
        assert!(HoneypotError::transient("timeout").is_retryable());
        assert!(!HoneypotError::rejected("400 Bad Request").is_retryable());
        assert!(!HoneypotError::validation("empty text").is_retryable());
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("threshold = ");
        let err: HoneypotError = parse.unwrap_err().into();
        assert!(matches!(err, HoneypotError::Serialization { ref format, .. } if format == "TOML"));
    }
}
