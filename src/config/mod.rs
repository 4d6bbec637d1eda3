//! Configuration types for the Botenix client.
//!
//! This module provides the configuration used to open a transport session
//! against the remote API.
//!
//! # Overview
//!
//! - [`ClientConfig`]: Session settings fixed at construction
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`BearerToken`]: A validated token newtype with masked debug output
//! - [`BaseUrl`]: A validated base URL for the remote API
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use botenix_client::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .base_url("https://chat.example.com/api/v4")
//!     .bearer_token("my-token")
//!     .timeout(Duration::from_secs(5))
//!     .build()
//!     .unwrap();
//!
//! assert!(config.bearer_token().is_some());
//! ```

mod newtypes;

pub use newtypes::{BaseUrl, BearerToken};

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

/// Session timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a transport session.
///
/// All settings are fixed once the session is opened.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: BaseUrl,
    timeout: Duration,
    verify_ssl: bool,
    bearer_token: Option<BearerToken>,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the session timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns whether TLS certificates are verified.
    #[must_use]
    pub const fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    /// Returns the bearer token, if one is configured.
    #[must_use]
    pub const fn bearer_token(&self) -> Option<&BearerToken> {
        self.bearer_token.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// `base_url` is required. All other fields have sensible defaults.
///
/// # Defaults
///
/// - `timeout`: 10 seconds
/// - `verify_ssl`: `true`
/// - `bearer_token`: `None` (requests are sent unauthenticated)
/// - `user_agent_prefix`: `None`
#[derive(Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    verify_ssl: Option<bool>,
    bearer_token: Option<String>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the session timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets whether TLS certificates are verified.
    #[must_use]
    pub const fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = Some(verify);
        self
    }

    /// Sets the bearer token attached to every request.
    ///
    /// An empty token is rejected by [`build`](Self::build). Leave the token
    /// unset to send unauthenticated requests.
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`], validating every field.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingRequiredField`] if `base_url` is not set
    /// - [`ConfigError::InvalidBaseUrl`] if `base_url` is malformed
    /// - [`ConfigError::MissingCredential`] if an empty bearer token was supplied
    /// - [`ConfigError::InvalidTimeout`] if the timeout is zero
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })
            .and_then(BaseUrl::new)?;

        let bearer_token = self.bearer_token.map(BearerToken::new).transpose()?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(ClientConfig {
            base_url,
            timeout,
            verify_ssl: self.verify_ssl.unwrap_or(true),
            bearer_token,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

impl fmt::Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("verify_ssl", &self.verify_ssl)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "*****"))
            .field("user_agent_prefix", &self.user_agent_prefix)
            .finish()
    }
}
