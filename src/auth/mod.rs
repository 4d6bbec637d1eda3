//! Authentication for outgoing requests.
//!
//! The remote API authenticates with a single static bearer token per
//! session. [`BearerAuth`] turns that token into a pre-request step that the
//! transport session applies to every request it sends.
//!
//! # Example
//!
//! ```rust
//! use botenix_client::auth::BearerAuth;
//!
//! let auth = BearerAuth::new("my-token").unwrap();
//! assert_eq!(auth.header_value(), "Bearer my-token");
//! ```

mod bearer;

pub use bearer::BearerAuth;
