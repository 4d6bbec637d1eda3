//! # Botenix API Client
//!
//! A typed async HTTP client for the Botenix messaging platform REST API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Session configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Static bearer token authentication via [`auth::BearerAuth`]
//! - A transport session ([`HttpClient`]) that performs single exchanges
//! - Verb dispatch ([`ApiClient`]) that serializes typed payloads, classifies
//!   responses, and validates them into records
//! - Field selection for typed payloads ([`FieldSelection`])
//! - A posts client built on the generic pipeline ([`posts::PostsClient`])
//!
//! ## Quick Start
//!
//! ```rust
//! use botenix_client::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .base_url("https://chat.example.com/api/v4")
//!     .bearer_token("your-token")
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Typed Calls
//!
//! ```rust,ignore
//! use botenix_client::{ApiClient, RequestOptions, TypeDescriptor};
//!
//! let client = ApiClient::new(&config)?;
//!
//! // Untyped: JSON comes back as a `serde_json::Value`
//! let raw = client.get().send("/system/ping").await?.into_json();
//!
//! // Typed: the response is validated into `Vec<Channel>`
//! let channels = client
//!     .get()
//!     .call(
//!         "/users/me/channels",
//!         RequestOptions::new().response(TypeDescriptor::<Channel>::many()),
//!     )
//!     .await?
//!     .into_records()?;
//!
//! client.close();
//! ```
//!
//! ## Typed Payloads
//!
//! Request records implement [`Model`], which declares each field's wire
//! alias and default value. The serializer applies, in order: `include` /
//! `exclude`, `exclude_unset`, `exclude_defaults`, `exclude_none`, then
//! `by_alias` key naming.
//!
//! ```rust,ignore
//! let options = RequestOptions::new()
//!     .payload(&member, TypeDescriptor::one())
//!     .by_alias(true)
//!     .exclude_defaults(true);
//! client.post().call("/members", options).await?;
//! ```
//!
//! ## Errors
//!
//! Configuration problems surface as [`ConfigError`] at construction time.
//! Calls return [`HttpError`], which distinguishes payload serialization,
//! transport, decoding, and response validation failures.
//!
//! ## Design Principles
//!
//! - **No global state**: every session is an explicit value
//! - **Fail-fast validation**: newtypes and builders validate on construction
//! - **One exchange per call**: no retries, redirects, or pagination
//! - **Thread-safe**: all clients are `Send + Sync`
//! - **Async-first**: designed for use with Tokio runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod model;
pub mod posts;

pub use auth::BearerAuth;
pub use config::{BaseUrl, BearerToken, ClientConfig, ClientConfigBuilder};
pub use error::ConfigError;

pub use clients::{
    ApiClient, FieldSelection, FilePart, HttpClient, HttpError, HttpMethod, HttpRequest,
    HttpRequestBuilder, HttpResponse, MethodHandler, PayloadSerializationError, QueryParams,
    RequestOptions, ResponseDecodeError, ResponseValidationError, TransportError, TypedResult,
};

pub use model::{FieldSpec, FieldsSet, Model, Payload, Shape, TypeDescriptor};
