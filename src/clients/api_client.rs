//! Verb dispatch over a transport session.
//!
//! [`ApiClient`] composes the request pipeline: payload serialization, one
//! HTTP exchange, response classification, and materialization into a
//! [`TypedResult`]. [`MethodHandler`] binds that pipeline to one verb.

use serde::de::DeserializeOwned;

use crate::clients::classify::classify;
use crate::clients::errors::HttpError;
use crate::clients::http_client::HttpClient;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::materialize::{materialize, TypedResult};
use crate::clients::request_options::RequestOptions;
use crate::config::ClientConfig;
use crate::error::ConfigError;

/// Typed client for the Botenix REST API.
///
/// Every call runs the same pipeline:
///
/// 1. If a typed payload is set, serialize it (honoring the field selection)
///    and use it as the JSON body, overriding any raw body.
/// 2. Send exactly one request through the [`HttpClient`].
/// 3. Classify the response by its `Content-Type` header.
/// 4. Return raw bytes, decoded JSON, or validated records.
///
/// Failures are logged with the verb and path before they are returned;
/// nothing is retried.
///
/// # Thread Safety
///
/// `ApiClient` is `Send + Sync`; calls take `&self` and may run concurrently.
///
/// # Example
///
/// ```rust,ignore
/// use botenix_client::{ApiClient, ClientConfig, RequestOptions, TypeDescriptor};
///
/// let config = ClientConfig::builder()
///     .base_url("https://chat.example.com/api/v4")
///     .bearer_token("token")
///     .build()?;
/// let client = ApiClient::new(&config)?;
///
/// let me = client
///     .get()
///     .call("/users/me", RequestOptions::new().response(TypeDescriptor::<User>::one()))
///     .await?
///     .into_record()?;
///
/// client.close();
/// ```
#[derive(Debug)]
pub struct ApiClient {
    http_client: HttpClient,
}

// Verify ApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiClient>();
};

impl ApiClient {
    /// Creates a client with its own transport session.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the transport session cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_http_client(HttpClient::new(config)?))
    }

    /// Wraps an existing transport session.
    #[must_use]
    pub const fn with_http_client(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    /// Returns the underlying transport session.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Returns the handler for `GET`.
    #[must_use]
    pub const fn get(&self) -> MethodHandler<'_> {
        self.handler(HttpMethod::Get)
    }

    /// Returns the handler for `POST`.
    #[must_use]
    pub const fn post(&self) -> MethodHandler<'_> {
        self.handler(HttpMethod::Post)
    }

    /// Returns the handler for `PUT`.
    #[must_use]
    pub const fn put(&self) -> MethodHandler<'_> {
        self.handler(HttpMethod::Put)
    }

    /// Returns the handler for `PATCH`.
    #[must_use]
    pub const fn patch(&self) -> MethodHandler<'_> {
        self.handler(HttpMethod::Patch)
    }

    /// Returns the handler for `DELETE`.
    #[must_use]
    pub const fn delete(&self) -> MethodHandler<'_> {
        self.handler(HttpMethod::Delete)
    }

    /// Returns the handler for an arbitrary verb.
    #[must_use]
    pub const fn handler(&self, method: HttpMethod) -> MethodHandler<'_> {
        MethodHandler {
            client: self,
            method,
        }
    }

    /// Runs the pipeline for `method` and `path`.
    ///
    /// # Errors
    ///
    /// - [`HttpError::Serialization`] if the typed payload does not conform
    ///   to its descriptor (no request is sent)
    /// - [`HttpError::Transport`] on network failure, timeout, or a non-2xx
    ///   status
    /// - [`HttpError::Decode`] if a JSON-typed body is not valid JSON
    /// - [`HttpError::Validation`] if the JSON does not match the response
    ///   descriptor
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions<'_, R>,
    ) -> Result<TypedResult<R>, HttpError> {
        tracing::debug!("Sending {} request to {}", method, path);

        let payload_type = options.payload_type();
        let parts = options.into_parts().map_err(|e| {
            tracing::error!(
                "{} {}: could not serialize {}: {}",
                method,
                path,
                payload_type.unwrap_or("payload"),
                e
            );
            e
        })?;

        let mut builder = HttpRequest::builder(method, path);
        if let Some(params) = parts.params {
            builder = builder.query(params);
        }
        if let Some(body) = parts.body {
            builder = builder.body(body);
        }
        if let Some(files) = parts.files {
            builder = builder.files(files);
        }

        let response = self.http_client.request(builder.build()).await?;

        let content_type = response.content_type();
        let kind = classify(content_type);

        materialize(response.body.clone(), kind, content_type, parts.response).map_err(|e| {
            match &e {
                HttpError::Validation(err) => {
                    tracing::error!("{} {}: response validation failed: {}", method, path, err);
                }
                HttpError::Decode(err) => {
                    tracing::error!("{} {}: {}", method, path, err);
                }
                HttpError::Serialization(_) | HttpError::Transport(_) => {}
            }
            e
        })
    }

    /// Shuts the transport session down.
    pub fn close(self) {
        self.http_client.close();
    }
}

/// The pipeline bound to one HTTP verb.
///
/// Obtained from [`ApiClient::get`], [`ApiClient::post`], and friends.
#[derive(Clone, Copy, Debug)]
pub struct MethodHandler<'c> {
    client: &'c ApiClient,
    method: HttpMethod,
}

impl MethodHandler<'_> {
    /// Returns the verb this handler sends.
    #[must_use]
    pub const fn method(self) -> HttpMethod {
        self.method
    }

    /// Runs the pipeline for `path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn call<R: DeserializeOwned>(
        self,
        path: &str,
        options: RequestOptions<'_, R>,
    ) -> Result<TypedResult<R>, HttpError> {
        self.client.request(self.method, path, options).await
    }

    /// Runs the pipeline for `path` with no query, body, or response type.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn send(self, path: &str) -> Result<TypedResult<serde_json::Value>, HttpError> {
        self.call(path, RequestOptions::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_client() -> ApiClient {
        let config = ClientConfig::builder()
            .base_url("http://testserver.com")
            .build()
            .unwrap();
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_handlers_are_bound_to_their_verbs() {
        let client = create_client();

        assert_eq!(client.get().method(), HttpMethod::Get);
        assert_eq!(client.post().method(), HttpMethod::Post);
        assert_eq!(client.put().method(), HttpMethod::Put);
        assert_eq!(client.patch().method(), HttpMethod::Patch);
        assert_eq!(client.delete().method(), HttpMethod::Delete);
    }

    #[test]
    fn test_handler_for_every_verb() {
        let client = create_client();

        for method in HttpMethod::ALL {
            assert_eq!(client.handler(method).method(), method);
        }
    }

    #[test]
    fn test_client_exposes_session() {
        let client = create_client();
        assert_eq!(client.http_client().base_url().as_ref(), "http://testserver.com");
        assert!(!client.http_client().is_authenticated());
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiClient>();
        assert_send_sync::<MethodHandler<'static>>();
    }
}
