//! Construction-time error types for the Botenix client.
//!
//! Everything that can go wrong before the first request is sent is reported
//! through [`ConfigError`]. Per-call failures live in
//! [`crate::clients::HttpError`].
//!
//! # Example
//!
//! ```rust
//! use botenix_client::{BearerToken, ConfigError};
//!
//! let result = BearerToken::new("");
//! assert!(matches!(result, Err(ConfigError::MissingCredential)));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring a client session.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A bearer token was supplied but it is empty.
    #[error("Bearer token is mandatory. Provide a non-empty token or omit it to send unauthenticated requests.")]
    MissingCredential,

    /// The bearer token cannot be encoded as an HTTP header value.
    #[error("Bearer token contains characters that are not valid in an HTTP header.")]
    InvalidCredential,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://chat.example.com/api/v4').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The session timeout must be greater than zero.
    #[error("Invalid timeout: the session timeout must be greater than zero.")]
    InvalidTimeout,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The underlying HTTP transport could not be initialized.
    #[error("Failed to initialize HTTP transport: {reason}")]
    TransportBuild {
        /// The reason reported by the transport.
        reason: String,
    },
}
