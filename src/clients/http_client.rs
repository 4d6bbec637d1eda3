//! Transport session for Botenix API communication.
//!
//! This module provides the [`HttpClient`] type, which owns one long-lived
//! connection pool and performs single HTTP exchanges against the API.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};

use crate::auth::BearerAuth;
use crate::clients::errors::{TransportError, TransportFailure};
use crate::clients::http_request::{HttpRequest, QueryParams, RequestFiles};
use crate::clients::http_response::HttpResponse;
use crate::config::{BaseUrl, ClientConfig};
use crate::error::ConfigError;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Transport session for the Botenix API.
///
/// The session fixes at construction:
/// - the base URL every request path is resolved against
/// - the timeout applied to every exchange
/// - whether TLS certificates are verified
/// - the bearer auth step, if a token was configured
///
/// Each call to [`request`](Self::request) performs exactly one exchange;
/// nothing is retried.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`. Concurrent calls share the underlying
/// connection pool without any caller-side locking.
///
/// # Example
///
/// ```rust,ignore
/// use botenix_client::{ClientConfig, HttpClient, HttpMethod, HttpRequest};
///
/// let config = ClientConfig::builder()
///     .base_url("https://chat.example.com/api/v4")
///     .bearer_token("token")
///     .build()?;
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/users/me").build();
/// let response = client.request(request).await?;
///
/// client.close();
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL every path is resolved against.
    base_url: BaseUrl,
    /// Timeout applied to each exchange.
    timeout: Duration,
    /// Whether TLS certificates are verified.
    verify_ssl: bool,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Pre-request auth step.
    auth: Option<BearerAuth>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Opens a transport session from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCredential`] if the bearer token cannot be
    /// sent as a header, or [`ConfigError::TransportBuild`] if the underlying
    /// client cannot be created (e.g. TLS initialization failure).
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let auth = config
            .bearer_token()
            .map(BearerAuth::from_token)
            .transpose()?;

        // Build User-Agent header
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Botenix Client v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.verify_ssl())
            .build()
            .map_err(|e| ConfigError::TransportBuild {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            timeout: config.timeout(),
            verify_ssl: config.verify_ssl(),
            default_headers,
            auth,
        })
    }

    /// Returns the base URL for this session.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the per-exchange timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns whether TLS certificates are verified.
    #[must_use]
    pub const fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    /// Returns `true` if requests carry a bearer token.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// Returns the default headers for this session.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Performs one HTTP exchange.
    ///
    /// Sends the verb, path, query, and either the JSON body or the multipart
    /// parts, then reads the full body. The auth step runs last, right before
    /// the request leaves.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on network failure, timeout, a request that
    /// cannot be assembled, or any non-2xx status. The error is logged before
    /// it is returned.
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = request.method;
        let path = request.path.clone();

        self.exchange(request).await.map_err(|failure| {
            tracing::error!("{} {} failed: {}", method, path, failure);
            TransportError {
                method,
                path,
                failure,
            }
        })
    }

    async fn exchange(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let url = self.resolve_url(&request.path, request.query.as_ref());

        let mut req_builder = self.client.request(request.method.into(), url);

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(QueryParams::Pairs(pairs)) = &request.query {
            req_builder = req_builder.query(pairs);
        }

        if let Some(files) = request.files {
            if request.body.is_some() {
                tracing::warn!(
                    "Both JSON body and files given for {} {}; sending multipart only",
                    request.method,
                    request.path
                );
            }
            req_builder = req_builder.multipart(Self::build_form(files)?);
        } else if let Some(body) = &request.body {
            req_builder = req_builder.json(body);
        }

        let mut wire_request = req_builder.build()?;
        if let Some(auth) = &self.auth {
            auth.apply(&mut wire_request);
        }

        let res = self.client.execute(wire_request).await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());

        if !res.status().is_success() {
            let body = match res.bytes().await {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    tracing::warn!(
                        "Could not read {} error body for {} {}: {}",
                        code,
                        request.method,
                        request.path,
                        e
                    );
                    String::new()
                }
            };
            return Err(TransportFailure::Status { code, body });
        }

        let body = res.bytes().await?;
        Ok(HttpResponse::new(code, headers, body))
    }

    /// Resolves the request URL, appending a pre-encoded query if present.
    fn resolve_url(&self, path: &str, query: Option<&QueryParams>) -> String {
        let mut url = self.base_url.join(path);
        if let Some(QueryParams::Encoded(encoded)) = query {
            if !encoded.is_empty() {
                url.push(if url.contains('?') { '&' } else { '?' });
                url.push_str(encoded);
            }
        }
        url
    }

    /// Builds a multipart form from named parts.
    fn build_form(files: RequestFiles) -> Result<Form, TransportFailure> {
        let mut form = Form::new();
        for (name, file) in files {
            let mut part = Part::bytes(file.content().to_vec());
            if let Some(file_name) = file.file_name_ref() {
                part = part.file_name(file_name.to_string());
            }
            if let Some(content_type) = file.content_type_ref() {
                part = part
                    .mime_str(content_type)
                    .map_err(|_| TransportFailure::InvalidRequest {
                        reason: format!("invalid content type '{content_type}' for part '{name}'"),
                    })?;
            }
            if !file.headers().is_empty() {
                let mut headers = HeaderMap::new();
                for (key, value) in file.headers() {
                    let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                        TransportFailure::InvalidRequest {
                            reason: format!("invalid header name '{key}' for part '{name}'"),
                        }
                    })?;
                    let header_value = HeaderValue::from_str(value).map_err(|_| {
                        TransportFailure::InvalidRequest {
                            reason: format!("invalid header value for '{key}' in part '{name}'"),
                        }
                    })?;
                    headers.append(header_name, header_value);
                }
                part = part.headers(headers);
            }
            form = form.part(name, part);
        }
        Ok(form)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Shuts the session down, releasing pooled connections.
    ///
    /// Consuming `self` makes a second close impossible. Dropping the session
    /// releases the same resources, so connections are freed on every exit
    /// path even when `close` is never reached.
    pub fn close(self) {
        drop(self);
        tracing::debug!("HTTP client session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::FilePart;

    fn create_test_config(token: Option<&str>) -> ClientConfig {
        let builder = ClientConfig::builder().base_url("http://testserver.com");
        let builder = match token {
            Some(token) => builder.bearer_token(token),
            None => builder,
        };
        builder.build().unwrap()
    }

    #[test]
    fn test_client_construction_with_config() {
        let client = HttpClient::new(&create_test_config(Some("test-token"))).unwrap();

        assert_eq!(client.base_url().as_ref(), "http://testserver.com");
        assert_eq!(client.timeout(), Duration::from_secs(10));
        assert!(client.verify_ssl());
        assert!(client.is_authenticated());
    }

    #[test]
    fn test_client_without_token_is_unauthenticated() {
        let client = HttpClient::new(&create_test_config(None)).unwrap();
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&create_test_config(None)).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("Botenix Client v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = ClientConfig::builder()
            .base_url("http://testserver.com")
            .user_agent_prefix("MyBot/1.0")
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyBot/1.0 | "));
    }

    #[test]
    fn test_accept_header_is_json() {
        let client = HttpClient::new(&create_test_config(None)).unwrap();

        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_resolve_url_with_encoded_query() {
        let client = HttpClient::new(&create_test_config(None)).unwrap();

        assert_eq!(
            client.resolve_url("/posts", Some(&QueryParams::encoded("page=1"))),
            "http://testserver.com/posts?page=1"
        );
        assert_eq!(
            client.resolve_url("/posts", Some(&QueryParams::new().append("page", 1))),
            "http://testserver.com/posts"
        );
        assert_eq!(client.resolve_url("posts", None), "http://testserver.com/posts");
    }

    #[test]
    fn test_build_form_rejects_invalid_part_header() {
        let files = vec![(
            "files".to_string(),
            FilePart::new("data").header("bad header", "x"),
        )];

        assert!(matches!(
            HttpClient::build_form(files),
            Err(TransportFailure::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_build_form_accepts_full_parts() {
        let files = vec![(
            "files".to_string(),
            FilePart::new("data")
                .file_name("data.csv")
                .content_type("text/csv")
                .header("X-Checksum", "abc"),
        )];

        assert!(HttpClient::build_form(files).is_ok());
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }

    #[test]
    fn test_close_consumes_session() {
        let client = HttpClient::new(&create_test_config(None)).unwrap();
        client.close();
    }
}
