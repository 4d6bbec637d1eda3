//! Bearer token header injection.

use std::fmt;

use reqwest::header::{HeaderValue, AUTHORIZATION};

use crate::config::BearerToken;
use crate::error::ConfigError;

/// Injects `Authorization: Bearer <token>` into outgoing requests.
///
/// The header value is encoded once at construction and marked sensitive so
/// it is never printed by the transport's own debug output. There is no
/// refresh: the token is fixed for the lifetime of the session.
#[derive(Clone)]
pub struct BearerAuth {
    header: HeaderValue,
}

impl BearerAuth {
    /// Creates a bearer auth step from a raw token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] if the token is empty, or
    /// [`ConfigError::InvalidCredential`] if it cannot be sent as a header.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        Self::from_token(&BearerToken::new(token)?)
    }

    /// Creates a bearer auth step from an already validated token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCredential`] if the token cannot be sent
    /// as a header.
    pub fn from_token(token: &BearerToken) -> Result<Self, ConfigError> {
        let mut header = HeaderValue::from_str(&format!("Bearer {}", token.as_ref()))
            .map_err(|_| ConfigError::InvalidCredential)?;
        header.set_sensitive(true);
        Ok(Self { header })
    }

    /// Returns the full `Authorization` header value.
    #[must_use]
    pub fn header_value(&self) -> &str {
        // Built from a `String`, so the value is always visible ASCII.
        self.header.to_str().unwrap_or_default()
    }

    /// Sets the `Authorization` header on `request`, replacing any existing value.
    pub fn apply(&self, request: &mut reqwest::Request) {
        request
            .headers_mut()
            .insert(AUTHORIZATION, self.header.clone());
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerAuth(*****)")
    }
}
