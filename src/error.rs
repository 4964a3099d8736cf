//! Error types for fpl-dl
//!
//! This module provides the error taxonomy used across the library:
//! - Transport failures (network errors and non-success HTTP replies)
//! - Decode failures, which on this API mean the game is being updated
//! - Schema mismatches, where a well-formed body has an unexpected shape
//! - Configuration errors raised before any network call is made
//! - Pagination safety-bound violations
//! - Per-identifier failure records collected by the fan-out aggregator

use thiserror::Error;

/// Result type alias for fpl-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for fpl-dl
///
/// Each variant includes enough context (request target, offending key) to
/// tell the user what went wrong without a backtrace.
#[derive(Debug, Error)]
pub enum Error {
    /// Network or HTTP client failure while talking to the API
    #[error("request to {target} failed: {source}")]
    Transport {
        /// The request target (URL or path) that failed
        target: String,
        /// The underlying HTTP client error
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success HTTP status
    #[error("request to {target} returned HTTP {status}")]
    HttpStatus {
        /// The request target (URL or path) that failed
        target: String,
        /// The HTTP status code returned
        status: u16,
    },

    /// The response body was not valid JSON for the expected shape
    ///
    /// The FPL API serves an HTML holding page while the game is being
    /// updated, so this is reported as temporary unavailability rather than
    /// a generic parse failure.
    #[error("the game is currently being updated, please try again later ({target}: {reason})")]
    Decode {
        /// The request target whose body could not be decoded
        target: String,
        /// The decoder's description of the problem
        reason: String,
    },

    /// The body was valid JSON but did not have the expected shape
    ///
    /// Unlike [`Error::Decode`] this points at a single odd record (a missing
    /// or mistyped field), not at the whole service being down.
    #[error("unexpected response shape from {target}: {reason}")]
    Schema {
        /// The request target whose body had the wrong shape
        target: String,
        /// The decoder's description of the mismatch
        reason: String,
    },

    /// Configuration or argument error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "league_type")
        key: Option<String>,
    },

    /// A page walk did not see the final page within the configured bound
    #[error("pagination did not finish within {max_pages} pages")]
    PaginationExhausted {
        /// The configured maximum number of pages
        max_pages: u32,
    },

    /// Login handshake failed
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Operation was cancelled through its cancellation token
    #[error("operation cancelled")]
    Cancelled,

    /// A referenced entity was not present in the data returned by the API
    #[error("not found: {0}")]
    NotFound(String),

    /// I/O error (export files, config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build a configuration error tied to a specific setting
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Whether this error came from the network or HTTP layer
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::HttpStatus { .. })
    }

    /// Whether this error means the upstream service is temporarily unavailable
    ///
    /// Callers use this to tell a maintenance window apart from a one-off bad
    /// record. A 503 reply counts as well as a body that is not JSON at all;
    /// a [`Error::Schema`] mismatch does not.
    pub fn is_service_unavailable(&self) -> bool {
        match self {
            Error::Decode { .. } => true,
            Error::HttpStatus { status, .. } => *status == 503,
            _ => false,
        }
    }
}

/// A single identifier whose fetch failed during a fan-out
///
/// The fan-out aggregator never drops a failed task silently: each failure is
/// recorded with the identifier that caused it.
#[derive(Debug)]
pub struct FetchFailure<I> {
    /// The identifier whose request failed
    pub id: I,
    /// Why it failed
    pub error: Error,
}

impl<I: std::fmt::Display> std::fmt::Display for FetchFailure<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id, self.error)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn decode_error() -> Error {
        Error::Decode {
            target: "events/".to_string(),
            reason: "expected value at line 1 column 1".to_string(),
        }
    }

    #[test]
    fn decode_error_reads_as_temporary_unavailability() {
        let message = decode_error().to_string();
        assert!(
            message.contains("currently being updated"),
            "unexpected message: {message}"
        );
        assert!(message.contains("try again later"));
        assert!(!message.starts_with("serialization error"));
    }

    #[test]
    fn decode_error_is_service_unavailable_not_transport() {
        let err = decode_error();
        assert!(err.is_service_unavailable());
        assert!(!err.is_transport());
    }

    #[test]
    fn schema_error_is_not_service_unavailable() {
        let err = Error::Schema {
            target: "element-summary/9".to_string(),
            reason: "missing field `history`".to_string(),
        };
        assert!(!err.is_service_unavailable());
        assert!(!err.is_transport());
        assert!(!err.to_string().contains("currently being updated"));
    }

    #[test]
    fn http_503_is_service_unavailable() {
        let err = Error::HttpStatus {
            target: "elements/".to_string(),
            status: 503,
        };
        assert!(err.is_transport());
        assert!(err.is_service_unavailable());
    }

    #[test]
    fn http_404_is_transport_only() {
        let err = Error::HttpStatus {
            target: "element-summary/9999".to_string(),
            status: 404,
        };
        assert!(err.is_transport());
        assert!(!err.is_service_unavailable());
    }

    #[test]
    fn config_helper_records_key() {
        let err = Error::config("unknown league type 'knockout'", "league_type");
        match &err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("league_type")),
            other => panic!("expected Config, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "configuration error: unknown league type 'knockout'"
        );
    }

    #[test]
    fn pagination_exhausted_names_the_bound() {
        let err = Error::PaginationExhausted { max_pages: 40 };
        assert_eq!(err.to_string(), "pagination did not finish within 40 pages");
    }

    #[test]
    fn fetch_failure_display_includes_identifier() {
        let failure = FetchFailure {
            id: 17u32,
            error: Error::NotFound("player 17".to_string()),
        };
        assert_eq!(failure.to_string(), "17: not found: player 17");
    }
}
