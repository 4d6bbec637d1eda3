//! Per-call error types for the Botenix client.
//!
//! Every failure of a call falls into exactly one category, so callers can
//! react differently to each:
//!
//! - [`PayloadSerializationError`]: the typed payload could not be turned into a body
//! - [`TransportError`]: the server could not be reached or rejected the request
//! - [`ResponseDecodeError`]: a JSON response body was not valid JSON
//! - [`ResponseValidationError`]: valid JSON did not match the expected record type
//! - [`HttpError`]: unified error type encompassing all of the above
//!
//! # Example
//!
//! ```rust,ignore
//! use botenix_client::clients::HttpError;
//!
//! match client.get().call("/posts/abc", options).await {
//!     Ok(result) => println!("{result:?}"),
//!     Err(HttpError::Transport(e)) => println!("retry later: {e}"),
//!     Err(HttpError::Validation(e)) => println!("schema drift: {e}"),
//!     Err(HttpError::Decode(e)) => println!("garbled body: {e}"),
//!     Err(HttpError::Serialization(e)) => println!("bad payload: {e}"),
//! }
//! ```

use std::fmt;

use thiserror::Error;

use crate::clients::http_request::HttpMethod;
use crate::model::Shape;

/// Error returned when a typed payload cannot be serialized into a body.
#[derive(Debug, Error)]
pub enum PayloadSerializationError {
    /// The payload's shape disagrees with the request descriptor.
    #[error("Payload for {type_name} is a {found} but the request descriptor expects a {expected}.")]
    ShapeMismatch {
        /// The record type named by the descriptor.
        type_name: &'static str,
        /// The shape named by the descriptor.
        expected: Shape,
        /// The shape of the value supplied.
        found: Shape,
    },

    /// A record serialized to something other than a JSON object.
    #[error("Payload {type_name} did not serialize to a JSON object{}.", .index.map(|i| format!(" at position {i}")).unwrap_or_default())]
    NotARecord {
        /// The record type named by the descriptor.
        type_name: &'static str,
        /// The element position, for sequence payloads.
        index: Option<usize>,
    },

    /// Positional selectors were used with a single-record descriptor.
    #[error("Positional field selection on {type_name} requires a sequence descriptor.")]
    PositionalSelector {
        /// The record type named by the descriptor.
        type_name: &'static str,
    },

    /// The record's `Serialize` implementation failed.
    #[error("Failed to serialize {type_name} payload: {source}")]
    Serialize {
        /// The record type named by the descriptor.
        type_name: &'static str,
        /// The underlying serializer error.
        #[source]
        source: serde_json::Error,
    },
}

/// The reason a transport exchange failed.
#[derive(Debug, Error)]
pub enum TransportFailure {
    /// The server answered with a non-2xx status code.
    #[error("server responded with status {code}")]
    Status {
        /// The HTTP status code of the response.
        code: u16,
        /// The response body, decoded lossily as text.
        body: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request could not be assembled (e.g. an invalid part content type).
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Why the request was rejected before sending.
        reason: String,
    },
}

/// Error returned when the server could not be reached or rejected the call.
///
/// Carries the verb and path of the failing call. Nothing is retried.
#[derive(Debug, Error)]
#[error("{method} {path} failed: {failure}")]
pub struct TransportError {
    /// The verb of the failing call.
    pub method: HttpMethod,
    /// The request path of the failing call.
    pub path: String,
    /// What went wrong.
    #[source]
    pub failure: TransportFailure,
}

impl TransportError {
    /// Returns the HTTP status code when the server rejected the request.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match &self.failure {
            TransportFailure::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns `true` if the exchange hit the session timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(&self.failure, TransportFailure::Network(e) if e.is_timeout())
    }

    /// Returns `true` if no connection could be established.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(&self.failure, TransportFailure::Network(e) if e.is_connect())
    }
}

/// Error returned when a response classified as JSON is not valid JSON.
#[derive(Debug, Error)]
#[error("Response declared '{content_type}' but the body is not valid JSON: {source}")]
pub struct ResponseDecodeError {
    /// The response `Content-Type` header.
    pub content_type: String,
    /// The underlying parser error.
    #[source]
    pub source: serde_json::Error,
}

/// A single field-level validation diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Location of the offending value (e.g. `[1].age`, or `.` for the root).
    pub path: String,
    /// What was wrong with it.
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Error returned when decoded JSON does not match the expected record type.
#[derive(Debug, Error)]
#[error("{} validation error(s) for {type_name}{}", .issues.len(), render_issues(.issues))]
pub struct ResponseValidationError {
    /// The record type the response was validated against.
    pub type_name: &'static str,
    /// One diagnostic per failing value, in document order.
    pub issues: Vec<ValidationIssue>,
}

fn render_issues(issues: &[ValidationIssue]) -> String {
    issues.iter().map(|issue| format!("\n  {issue}")).collect()
}

/// Unified error type for all per-call failures.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The typed payload could not be serialized.
    #[error(transparent)]
    Serialization(#[from] PayloadSerializationError),

    /// Network failure or non-2xx status.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A JSON response body could not be decoded.
    #[error(transparent)]
    Decode(#[from] ResponseDecodeError),

    /// Decoded JSON did not match the expected record type.
    #[error(transparent)]
    Validation(#[from] ResponseValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(code: u16) -> TransportError {
        TransportError {
            method: HttpMethod::Get,
            path: "/posts/abc".to_string(),
            failure: TransportFailure::Status {
                code,
                body: r#"{"message":"not found"}"#.to_string(),
            },
        }
    }

    #[test]
    fn test_transport_error_includes_verb_and_path() {
        let message = status_error(404).to_string();
        assert!(message.contains("GET /posts/abc"));
        assert!(message.contains("404"));
    }

    #[test]
    fn test_transport_error_exposes_status() {
        assert_eq!(status_error(503).status(), Some(503));
        assert!(!status_error(503).is_timeout());

        let invalid = TransportError {
            method: HttpMethod::Post,
            path: "/files".to_string(),
            failure: TransportFailure::InvalidRequest {
                reason: "bad mime".to_string(),
            },
        };
        assert_eq!(invalid.status(), None);
    }

    #[test]
    fn test_shape_mismatch_message() {
        let error = PayloadSerializationError::ShapeMismatch {
            type_name: "Post",
            expected: Shape::Many,
            found: Shape::One,
        };
        assert_eq!(
            error.to_string(),
            "Payload for Post is a single record but the request descriptor expects a sequence of records."
        );
    }

    #[test]
    fn test_not_a_record_message_mentions_position() {
        let error = PayloadSerializationError::NotARecord {
            type_name: "Post",
            index: Some(2),
        };
        assert!(error.to_string().contains("at position 2"));

        let error = PayloadSerializationError::NotARecord {
            type_name: "Post",
            index: None,
        };
        assert!(!error.to_string().contains("position"));
    }

    #[test]
    fn test_validation_error_lists_every_issue() {
        let error = ResponseValidationError {
            type_name: "Post",
            issues: vec![
                ValidationIssue {
                    path: "[0]".to_string(),
                    message: "missing field `id`".to_string(),
                },
                ValidationIssue {
                    path: "[1].age".to_string(),
                    message: "invalid type".to_string(),
                },
            ],
        };
        let message = error.to_string();
        assert!(message.starts_with("2 validation error(s) for Post"));
        assert!(message.contains("[0]: missing field `id`"));
        assert!(message.contains("[1].age: invalid type"));
    }

    #[test]
    fn test_http_error_is_transparent() {
        let error: HttpError = status_error(500).into();
        assert!(matches!(error, HttpError::Transport(_)));
        assert!(error.to_string().contains("GET /posts/abc failed"));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let _: &dyn std::error::Error = &status_error(400);
        let _: &dyn std::error::Error = &PayloadSerializationError::PositionalSelector {
            type_name: "Post",
        };
    }
}
