//! HTTP request types for the Botenix client.
//!
//! This module provides the [`HttpRequest`] type and its builder, plus the
//! query-parameter and multipart file-part types an outgoing request carries.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use bytes::Bytes;

/// HTTP methods supported by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partially updating resources.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Every supported method, in a fixed order.
    pub const ALL: [Self; 5] = [Self::Get, Self::Post, Self::Put, Self::Patch, Self::Delete];

    /// Returns the upper-case wire name of this method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// A primitive query-string value.
///
/// Values render the way the remote API expects: booleans as `true`/`false`,
/// numbers in their shortest form, and `None` as an empty string.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
    /// A string value, sent as-is.
    Str(String),
    /// An integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// An absent value, sent as an empty string.
    None,
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::None => Ok(()),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

/// One or more query values sent under the same key.
///
/// Scalars produce one pair; vectors and arrays produce one pair per element,
/// so a map such as `{"user_ids": ["a", "b"]}` renders as
/// `user_ids=a&user_ids=b`.
pub trait QueryValues {
    /// Converts `self` into the values to send, in order.
    fn into_query_values(self) -> Vec<QueryValue>;
}

macro_rules! scalar_query_values {
    ($($ty:ty),* $(,)?) => {
        $(
            impl QueryValues for $ty {
                fn into_query_values(self) -> Vec<QueryValue> {
                    vec![self.into()]
                }
            }
        )*
    };
}

scalar_query_values!(QueryValue, &str, String, i64, i32, u32, f64, bool);

impl<T: Into<QueryValue>> QueryValues for Option<T> {
    fn into_query_values(self) -> Vec<QueryValue> {
        vec![self.into()]
    }
}

impl<T: Into<QueryValue>> QueryValues for Vec<T> {
    fn into_query_values(self) -> Vec<QueryValue> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<QueryValue>, const N: usize> QueryValues for [T; N] {
    fn into_query_values(self) -> Vec<QueryValue> {
        self.into_iter().map(Into::into).collect()
    }
}

/// Query parameters for a request.
///
/// Either an ordered list of key/value pairs (repeated keys allowed) or a
/// pre-encoded query string that is passed through untouched.
///
/// # Example
///
/// ```rust
/// use botenix_client::clients::QueryParams;
///
/// let params = QueryParams::new()
///     .append("page", 0)
///     .append("per_page", 60)
///     .append_all("user_ids", ["a", "b"]);
///
/// assert_eq!(
///     params.pairs().unwrap(),
///     &[
///         ("page".to_string(), "0".to_string()),
///         ("per_page".to_string(), "60".to_string()),
///         ("user_ids".to_string(), "a".to_string()),
///         ("user_ids".to_string(), "b".to_string()),
///     ]
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryParams {
    /// Ordered key/value pairs, encoded by the transport.
    Pairs(Vec<(String, String)>),
    /// An already encoded query string (without the leading `?`).
    Encoded(String),
}

impl QueryParams {
    /// Creates an empty pair list.
    #[must_use]
    pub const fn new() -> Self {
        Self::Pairs(Vec::new())
    }

    /// Creates a pre-encoded query string.
    #[must_use]
    pub fn encoded(query: impl Into<String>) -> Self {
        Self::Encoded(query.into().trim_start_matches('?').to_string())
    }

    /// Appends one key/value pair.
    ///
    /// Appending to a pre-encoded query extends the encoded string.
    #[must_use]
    pub fn append(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        let key = key.into();
        let value = value.into().to_string();
        match &mut self {
            Self::Pairs(pairs) => pairs.push((key, value)),
            Self::Encoded(query) => {
                if !query.is_empty() {
                    query.push('&');
                }
                query.push_str(&urlencoding::encode(&key));
                query.push('=');
                query.push_str(&urlencoding::encode(&value));
            }
        }
        self
    }

    /// Appends one pair per value, all sharing `key`.
    #[must_use]
    pub fn append_all<I, V>(self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<QueryValue>,
    {
        let key = key.into();
        values
            .into_iter()
            .fold(self, |params, value| params.append(key.clone(), value))
    }

    fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: QueryValues,
    {
        entries.into_iter().fold(Self::new(), |params, (key, values)| {
            params.append_all(key, values.into_query_values())
        })
    }

    /// Returns the pairs, or `None` for a pre-encoded query.
    #[must_use]
    pub fn pairs(&self) -> Option<&[(String, String)]> {
        match self {
            Self::Pairs(pairs) => Some(pairs),
            Self::Encoded(_) => None,
        }
    }

    /// Returns `true` if there is nothing to send.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Pairs(pairs) => pairs.is_empty(),
            Self::Encoded(query) => query.is_empty(),
        }
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for QueryParams {
    fn from(query: &str) -> Self {
        Self::encoded(query)
    }
}

impl From<String> for QueryParams {
    fn from(query: String) -> Self {
        Self::encoded(query)
    }
}

/// Bytes that are not valid UTF-8 are percent-encoded; everything else is
/// passed through as-is.
impl From<&[u8]> for QueryParams {
    fn from(query: &[u8]) -> Self {
        Self::encoded(escape_invalid_utf8(query))
    }
}

fn escape_invalid_utf8(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(err) => {
                let (valid, rest) = bytes.split_at(err.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let invalid = err.error_len().unwrap_or(rest.len());
                for byte in &rest[..invalid] {
                    out.push_str(&format!("%{byte:02X}"));
                }
                bytes = &rest[invalid..];
            }
        }
    }
}

impl<K, V> From<Vec<(K, V)>> for QueryParams
where
    K: Into<String>,
    V: QueryValues,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self::from_entries(pairs)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for QueryParams
where
    K: Into<String>,
    V: QueryValues,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from_entries(pairs)
    }
}

impl<K, V> From<BTreeMap<K, V>> for QueryParams
where
    K: Into<String>,
    V: QueryValues,
{
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::from_entries(map)
    }
}

impl<K, V, S> From<HashMap<K, V, S>> for QueryParams
where
    K: Into<String>,
    V: QueryValues,
{
    fn from(map: HashMap<K, V, S>) -> Self {
        Self::from_entries(map)
    }
}

/// One part of a multipart upload.
///
/// # Example
///
/// ```rust
/// use botenix_client::clients::FilePart;
///
/// let part = FilePart::new("hello")
///     .file_name("hello.txt")
///     .content_type("text/plain")
///     .header("X-Checksum", "abc");
///
/// assert_eq!(part.content().as_ref(), b"hello");
/// assert_eq!(part.file_name_ref(), Some("hello.txt"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePart {
    content: Bytes,
    file_name: Option<String>,
    content_type: Option<String>,
    headers: Vec<(String, String)>,
}

impl FilePart {
    /// Creates a part from raw content.
    #[must_use]
    pub fn new(content: impl Into<Bytes>) -> Self {
        Self {
            content: content.into(),
            file_name: None,
            content_type: None,
            headers: Vec::new(),
        }
    }

    /// Sets the file name sent in the part's `Content-Disposition`.
    #[must_use]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Sets the part's `Content-Type`.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Adds an extra header to this part.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the part content.
    #[must_use]
    pub const fn content(&self) -> &Bytes {
        &self.content
    }

    /// Returns the file name, if set.
    #[must_use]
    pub fn file_name_ref(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Returns the content type, if set.
    #[must_use]
    pub fn content_type_ref(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the extra headers.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

/// Named multipart parts, in send order.
pub type RequestFiles = Vec<(String, FilePart)>;

/// An HTTP request to be sent by the transport session.
///
/// Built fresh for every call. Use [`HttpRequest::builder`] to construct one.
///
/// # Example
///
/// ```rust
/// use botenix_client::clients::{HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Post, "/posts")
///     .body(json!({"channel_id": "c1", "message": "hi"}))
///     .build();
///
/// assert_eq!(request.method, HttpMethod::Post);
/// assert!(request.body.is_some());
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub method: HttpMethod,
    /// The path, relative to the session base URL (or absolute).
    pub path: String,
    /// Query parameters to append to the URL.
    pub query: Option<QueryParams>,
    /// The JSON body, if any.
    pub body: Option<serde_json::Value>,
    /// Multipart parts; when present the body is ignored.
    pub files: Option<RequestFiles>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: HttpMethod,
    path: String,
    query: Option<QueryParams>,
    body: Option<serde_json::Value>,
    files: Option<RequestFiles>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
            files: None,
        }
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn query(mut self, query: impl Into<QueryParams>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the multipart parts.
    #[must_use]
    pub fn files(mut self, files: RequestFiles) -> Self {
        self.files = Some(files);
        self
    }

    /// Adds a single multipart part.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, part: FilePart) -> Self {
        self.files
            .get_or_insert_with(Vec::new)
            .push((name.into(), part));
        self
    }

    /// Builds the [`HttpRequest`].
    #[must_use]
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            method: self.method,
            path: self.path,
            query: self.query,
            body: self.body,
            files: self.files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_http_method_maps_to_reqwest() {
        for method in HttpMethod::ALL {
            let wire: reqwest::Method = method.into();
            assert_eq!(wire.as_str(), method.as_str());
        }
    }

    #[test]
    fn test_query_value_rendering() {
        assert_eq!(QueryValue::from(true).to_string(), "true");
        assert_eq!(QueryValue::from(42_i64).to_string(), "42");
        assert_eq!(QueryValue::from(1.5).to_string(), "1.5");
        assert_eq!(QueryValue::from(None::<&str>).to_string(), "");
        assert_eq!(QueryValue::from(Some("x")).to_string(), "x");
    }

    #[test]
    fn test_query_params_from_pairs_keep_order() {
        let params = QueryParams::from(vec![("b", "2"), ("a", "1"), ("b", "3")]);
        assert_eq!(
            params.pairs().unwrap(),
            &[
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_params_from_map() {
        let mut map = BTreeMap::new();
        map.insert("since", QueryValue::from(1_700_000_000_000_i64));
        map.insert("include_deleted", QueryValue::from(false));

        let params = QueryParams::from(map);
        let pairs = params.pairs().unwrap();
        assert!(pairs.contains(&("include_deleted".to_string(), "false".to_string())));
        assert!(pairs.contains(&("since".to_string(), "1700000000000".to_string())));
    }

    #[test]
    fn test_encoded_query_passes_through() {
        let params = QueryParams::from("?a=1&b=two%20words");
        assert_eq!(params, QueryParams::Encoded("a=1&b=two%20words".to_string()));
        assert!(params.pairs().is_none());

        let bytes: &[u8] = b"x=1";
        assert_eq!(QueryParams::from(bytes), QueryParams::Encoded("x=1".to_string()));
    }

    #[test]
    fn test_query_params_from_map_with_multiple_values() {
        let mut map = BTreeMap::new();
        map.insert("user_ids", vec!["a", "b"]);
        map.insert("team", vec!["t1"]);

        let params = QueryParams::from(map);
        assert_eq!(
            params.pairs().unwrap(),
            &[
                ("team".to_string(), "t1".to_string()),
                ("user_ids".to_string(), "a".to_string()),
                ("user_ids".to_string(), "b".to_string()),
            ]
        );

        let params = QueryParams::from(HashMap::from([("ids", ["x", "y"])]));
        assert_eq!(params.pairs().unwrap().len(), 2);
    }

    #[test]
    fn test_query_params_from_map_with_mixed_values() {
        let mut map = BTreeMap::new();
        map.insert("page", vec![QueryValue::from(0)]);
        map.insert("in", vec![QueryValue::from("a"), QueryValue::from(true)]);

        let params = QueryParams::from(map);
        assert_eq!(
            params.pairs().unwrap(),
            &[
                ("in".to_string(), "a".to_string()),
                ("in".to_string(), "true".to_string()),
                ("page".to_string(), "0".to_string()),
            ]
        );
    }

    #[test]
    fn test_encoded_bytes_escape_invalid_utf8() {
        let bytes: &[u8] = b"k=\xff&q=caf\xc3\xa9\xc3";
        assert_eq!(
            QueryParams::from(bytes),
            QueryParams::Encoded("k=%FF&q=caf\u{e9}%C3".to_string())
        );
    }

    #[test]
    fn test_append_to_encoded_query_escapes() {
        let params = QueryParams::encoded("a=1").append("q", "hello world");
        assert_eq!(params, QueryParams::Encoded("a=1&q=hello%20world".to_string()));
    }

    #[test]
    fn test_builder_creates_request() {
        let request = HttpRequest::builder(HttpMethod::Patch, "/posts/abc/patch")
            .query(vec![("set_online", true)])
            .body(json!({"message": "edited"}))
            .build();

        assert_eq!(request.method, HttpMethod::Patch);
        assert_eq!(request.path, "/posts/abc/patch");
        assert!(request.query.is_some());
        assert_eq!(request.body, Some(json!({"message": "edited"})));
        assert!(request.files.is_none());
    }

    #[test]
    fn test_builder_collects_files_in_order() {
        let request = HttpRequest::builder(HttpMethod::Post, "/files")
            .file("files", FilePart::new("one").file_name("1.txt"))
            .file("files", FilePart::new("two").file_name("2.txt"))
            .build();

        let files = request.files.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].1.file_name_ref(), Some("1.txt"));
        assert_eq!(files[1].1.file_name_ref(), Some("2.txt"));
    }
}
