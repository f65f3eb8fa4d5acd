//! Error types for the gestão agent client

use std::io;

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for the agent client
pub type Result<T> = std::result::Result<T, Error>;

/// Agent client errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection, timeout or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Endpoint answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status
        status: StatusCode,
        /// Response body, as text
        body: String,
    },

    /// Endpoint answered with a body that is not JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Envelope content the client cannot interpret
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error happened while talking to the endpoint.
    ///
    /// Covers connection failures, non-2xx statuses and non-JSON bodies.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::InvalidResponse(_)
        )
    }

    /// Process exit code for the CLI
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 78,
            Self::Transport(_) | Self::Status { .. } | Self::InvalidResponse(_) => 69,
            Self::Protocol(_) | Self::Json(_) => 65,
            Self::Io(_) => 74,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(Error::Transport("refused".into()).is_transport());
        assert!(
            Error::Status {
                status: StatusCode::BAD_GATEWAY,
                body: String::new(),
            }
            .is_transport()
        );
        assert!(Error::InvalidResponse("not json".into()).is_transport());
        assert!(!Error::Config("no user".into()).is_transport());
        assert!(!Error::Protocol("bad data".into()).is_transport());
    }

    #[test]
    fn test_status_display_keeps_body() {
        let err = Error::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500 Internal Server Error: boom");
    }

    #[test]
    fn test_exit_codes_are_distinct_per_class() {
        assert_eq!(Error::Config(String::new()).exit_code(), 78);
        assert_eq!(Error::Transport(String::new()).exit_code(), 69);
        assert_eq!(Error::Protocol(String::new()).exit_code(), 65);
    }

    #[test]
    fn test_io_error_converts_and_maps_to_io_exit_code() {
        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed").into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_transport());
        assert_eq!(err.exit_code(), 74);
    }
}
