//! HTTP client types for Botenix API communication.
//!
//! This module provides the request pipeline: typed payloads go out as JSON,
//! responses come back as raw bytes, decoded JSON, or validated records.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ApiClient`]: Verb dispatch over one transport session
//! - [`MethodHandler`]: The pipeline bound to one [`HttpMethod`]
//! - [`RequestOptions`]: Query, body, payload, files, and descriptors for a call
//! - [`FieldSelection`]: Field filtering and key naming for typed payloads
//! - [`TypedResult`]: The outcome of a call
//! - [`HttpClient`]: The transport session performing single exchanges
//! - [`HttpRequest`] / [`HttpResponse`]: One raw exchange
//!
//! # Example
//!
//! ```rust,ignore
//! use botenix_client::{ApiClient, ClientConfig, RequestOptions, TypeDescriptor};
//!
//! let client = ApiClient::new(&config)?;
//!
//! let created = client
//!     .post()
//!     .call(
//!         "/users",
//!         RequestOptions::new()
//!             .payload(&new_user, TypeDescriptor::one())
//!             .by_alias(true)
//!             .exclude_none(true)
//!             .response(TypeDescriptor::<User>::one()),
//!     )
//!     .await?
//!     .into_record()?;
//! ```
//!
//! # Response Handling
//!
//! A response is structured only when its `Content-Type` contains
//! `application/json`. Anything else is returned as bytes, even if the body
//! happens to parse as JSON.

mod api_client;
mod classify;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod materialize;
mod request_options;
mod serializer;

pub use api_client::{ApiClient, MethodHandler};
pub use classify::{classify, ContentKind, JSON_MEDIA_TYPE};
pub use errors::{
    HttpError, PayloadSerializationError, ResponseDecodeError, ResponseValidationError,
    TransportError, TransportFailure, ValidationIssue,
};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{
    FilePart, HttpMethod, HttpRequest, HttpRequestBuilder, QueryParams, QueryValue, QueryValues,
    RequestFiles,
};
pub use http_response::HttpResponse;
pub use materialize::{materialize, validate, TypedResult};
pub use request_options::RequestOptions;
pub use serializer::{prepare_body, serialize, FieldSelection, Selector};
