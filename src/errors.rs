//! Error handling for the log terminal
//!
//! None of these errors ever escape the public logging calls. They exist so
//! the relay and payload code paths can propagate failures with `?`
//! up to the point where the logger turns them into a local fallback.

use thiserror::Error;

/// Main error type for the log terminal
#[derive(Error, Debug)]
pub enum LogTerminalError {
    #[error("Relay request failed: {endpoint}")]
    Relay {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status}")]
    RelayStatus { status: u16 },

    #[error("No async runtime available to relay log")]
    NoRuntime,

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid log payload: {field} - {message}")]
    Payload { field: String, message: String },
}

/// Type alias for Result with LogTerminalError
pub type LogTerminalResult<T> = Result<T, LogTerminalError>;

impl LogTerminalError {
    /// Create a relay transport error
    pub fn relay(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Relay {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Create a payload validation error
    pub fn payload(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Payload {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from the relay transport rather than local processing.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Relay { .. } | Self::RelayStatus { .. } | Self::NoRuntime
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = LogTerminalError::RelayStatus { status: 500 };
        assert_eq!(err.to_string(), "HTTP 500");
        assert!(err.is_transport());
    }

    #[test]
    fn test_payload_error_is_not_transport() {
        let err = LogTerminalError::payload("level", "unknown level 'trace'");
        assert!(!err.is_transport());
        assert!(err.to_string().contains("level"));
    }
}
