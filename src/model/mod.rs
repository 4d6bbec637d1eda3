//! Record schemas and type descriptors.
//!
//! The pipeline never inspects a record's Rust type at runtime. Instead each
//! request record implements [`Model`], which exposes a static field table
//! ([`FieldSpec`]) used by the payload serializer for aliasing and
//! default-value comparison, and optionally the set of fields the caller
//! explicitly assigned ([`FieldsSet`]).
//!
//! [`TypeDescriptor`] names the shape expected on either side of a call: a
//! single record or a sequence of records.
//!
//! # Example
//!
//! ```rust
//! use botenix_client::model::{FieldSpec, Model};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Member {
//!     #[serde(alias = "full_name")]
//!     name: String,
//!     active: bool,
//! }
//!
//! fn active_default() -> serde_json::Value {
//!     serde_json::Value::Bool(true)
//! }
//!
//! impl Model for Member {
//!     fn schema() -> &'static [FieldSpec] {
//!         const FIELDS: &[FieldSpec] = &[
//!             FieldSpec::new("name").alias("full_name"),
//!             FieldSpec::new("active").default_with(active_default),
//!         ];
//!         FIELDS
//!     }
//! }
//!
//! assert_eq!(Member::field("name").unwrap().wire_name(true), "full_name");
//! ```

mod descriptor;

pub use descriptor::{Payload, Shape, TypeDescriptor};

use std::collections::BTreeSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A record type that can be sent as a typed request payload.
///
/// The record's `Serialize` implementation must emit its canonical field
/// names; wire aliases are declared in [`schema`](Model::schema) and applied
/// by the serializer when `by_alias` is requested.
pub trait Model: Serialize + DeserializeOwned {
    /// Returns the static field table for this record type.
    fn schema() -> &'static [FieldSpec];

    /// Returns the fields the caller explicitly assigned on this value.
    ///
    /// `None` means every field counts as set, which makes `exclude_unset`
    /// a no-op for this record.
    fn fields_set(&self) -> Option<&FieldsSet> {
        None
    }

    /// Looks up a field by canonical name.
    #[must_use]
    fn field(name: &str) -> Option<&'static FieldSpec> {
        Self::schema().iter().find(|spec| spec.name == name)
    }
}

/// Static description of one record field.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    name: &'static str,
    alias: Option<&'static str>,
    default: Option<fn() -> Value>,
}

impl FieldSpec {
    /// Declares a field with no alias and no declared default.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            default: None,
        }
    }

    /// Sets the wire alias used when serializing by alias.
    #[must_use]
    pub const fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Declares the field's static default value.
    ///
    /// `exclude_defaults` drops the field whenever its serialized value is
    /// equal to the value produced by `default`.
    #[must_use]
    pub const fn default_with(mut self, default: fn() -> Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Declares `null` as the field's static default.
    #[must_use]
    pub const fn default_null(self) -> Self {
        self.default_with(null_default)
    }

    /// Returns the canonical field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared wire alias, if any.
    #[must_use]
    pub const fn alias_name(&self) -> Option<&'static str> {
        self.alias
    }

    /// Returns the key this field is written under.
    #[must_use]
    pub fn wire_name(&self, by_alias: bool) -> &'static str {
        if by_alias {
            self.alias.unwrap_or(self.name)
        } else {
            self.name
        }
    }

    /// Returns the declared default value, or `None` if there is none.
    #[must_use]
    pub fn default_value(&self) -> Option<Value> {
        self.default.map(|default| default())
    }
}

fn null_default() -> Value {
    Value::Null
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("default", &self.default_value())
            .finish()
    }
}

/// The set of fields a caller explicitly assigned on a record.
///
/// Records that want `exclude_unset` support keep one of these (typically
/// as a `#[serde(skip)]` field) and return it from [`Model::fields_set`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldsSet(BTreeSet<&'static str>);

impl FieldsSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Marks `name` as explicitly set.
    pub fn insert(&mut self, name: &'static str) {
        self.0.insert(name);
    }

    /// Returns `true` if `name` was explicitly set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Returns the number of explicitly set fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no field was explicitly set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<&'static str> for FieldsSet {
    fn from_iter<I: IntoIterator<Item = &'static str>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
