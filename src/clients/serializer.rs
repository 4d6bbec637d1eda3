//! Typed payload serialization with field selection.
//!
//! [`serialize`] turns a [`Payload`] into the JSON body of a request. Each
//! record is first rendered with its own `Serialize` implementation, then
//! passed through the filters of a [`FieldSelection`] in a fixed order:
//!
//! 1. `include` / `exclude`
//! 2. `exclude_unset`
//! 3. `exclude_defaults`
//! 4. `exclude_none`
//! 5. key naming (`by_alias`)
//!
//! Filters only ever see canonical field names; renaming happens last.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::clients::errors::PayloadSerializationError;
use crate::model::{Model, Payload, TypeDescriptor};

/// A set of fields or sequence positions for `include` / `exclude`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// Canonical field names, applied to every record.
    Fields(BTreeSet<String>),
    /// Element positions, only valid for sequence payloads.
    Positions(BTreeSet<usize>),
}

impl Selector {
    /// Selects fields by canonical name.
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fields(names.into_iter().map(Into::into).collect())
    }

    /// Selects sequence elements by position.
    pub fn positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Self::Positions(positions.into_iter().collect())
    }

    fn allows_field(&self, name: &str) -> bool {
        match self {
            Self::Fields(names) => names.contains(name),
            Self::Positions(_) => true,
        }
    }

    fn names_field(&self, name: &str) -> bool {
        match self {
            Self::Fields(names) => names.contains(name),
            Self::Positions(_) => false,
        }
    }

    fn allows_position(&self, index: usize) -> bool {
        match self {
            Self::Positions(positions) => positions.contains(&index),
            Self::Fields(_) => true,
        }
    }

    fn names_position(&self, index: usize) -> bool {
        match self {
            Self::Positions(positions) => positions.contains(&index),
            Self::Fields(_) => false,
        }
    }
}

impl<const N: usize> From<[&str; N]> for Selector {
    fn from(names: [&str; N]) -> Self {
        Self::fields(names)
    }
}

impl From<Vec<String>> for Selector {
    fn from(names: Vec<String>) -> Self {
        Self::fields(names)
    }
}

impl<const N: usize> From<[usize; N]> for Selector {
    fn from(positions: [usize; N]) -> Self {
        Self::positions(positions)
    }
}

/// Field-selection rules applied when serializing a typed payload.
///
/// Immutable once built; the default selects every field under its
/// canonical name.
///
/// # Example
///
/// ```rust
/// use botenix_client::clients::FieldSelection;
///
/// let selection = FieldSelection::new()
///     .exclude(["age", "newsletter"])
///     .by_alias(true)
///     .exclude_none(true);
///
/// assert!(selection.is_by_alias());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSelection {
    include: Option<Selector>,
    exclude: Option<Selector>,
    by_alias: bool,
    exclude_unset: bool,
    exclude_defaults: bool,
    exclude_none: bool,
}

impl FieldSelection {
    /// Creates a selection that keeps every field.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            include: None,
            exclude: None,
            by_alias: false,
            exclude_unset: false,
            exclude_defaults: false,
            exclude_none: false,
        }
    }

    /// Keeps only the selected fields or positions.
    #[must_use]
    pub fn include(mut self, selector: impl Into<Selector>) -> Self {
        self.include = Some(selector.into());
        self
    }

    /// Drops the selected fields or positions, after `include` is applied.
    #[must_use]
    pub fn exclude(mut self, selector: impl Into<Selector>) -> Self {
        self.exclude = Some(selector.into());
        self
    }

    /// Writes keys under their declared wire alias.
    #[must_use]
    pub const fn by_alias(mut self, enabled: bool) -> Self {
        self.by_alias = enabled;
        self
    }

    /// Drops fields the caller never explicitly set.
    #[must_use]
    pub const fn exclude_unset(mut self, enabled: bool) -> Self {
        self.exclude_unset = enabled;
        self
    }

    /// Drops fields equal to their declared static default.
    #[must_use]
    pub const fn exclude_defaults(mut self, enabled: bool) -> Self {
        self.exclude_defaults = enabled;
        self
    }

    /// Drops fields whose value is `null`.
    #[must_use]
    pub const fn exclude_none(mut self, enabled: bool) -> Self {
        self.exclude_none = enabled;
        self
    }

    /// Returns the include selector.
    #[must_use]
    pub const fn included(&self) -> Option<&Selector> {
        self.include.as_ref()
    }

    /// Returns the exclude selector.
    #[must_use]
    pub const fn excluded(&self) -> Option<&Selector> {
        self.exclude.as_ref()
    }

    /// Returns whether keys are written by alias.
    #[must_use]
    pub const fn is_by_alias(&self) -> bool {
        self.by_alias
    }

    fn has_positions(&self) -> bool {
        [&self.include, &self.exclude]
            .into_iter()
            .flatten()
            .any(|selector| matches!(selector, Selector::Positions(_)))
    }

    fn keeps_position(&self, index: usize) -> bool {
        self.include
            .as_ref()
            .map_or(true, |include| include.allows_position(index))
            && !self
                .exclude
                .as_ref()
                .is_some_and(|exclude| exclude.names_position(index))
    }

    fn keeps_field<M: Model>(&self, record: &M, name: &str, value: &Value) -> bool {
        if let Some(include) = &self.include {
            if !include.allows_field(name) {
                return false;
            }
        }
        if self
            .exclude
            .as_ref()
            .is_some_and(|exclude| exclude.names_field(name))
        {
            return false;
        }

        let spec = M::field(name);

        if self.exclude_unset {
            if let (Some(set), Some(_)) = (record.fields_set(), spec) {
                if !set.contains(name) {
                    return false;
                }
            }
        }

        if self.exclude_defaults {
            if let Some(default) = spec.and_then(|spec| spec.default_value()) {
                if *value == default {
                    return false;
                }
            }
        }

        !(self.exclude_none && value.is_null())
    }
}

/// Serializes a typed payload into a JSON body.
///
/// The payload's shape must match `descriptor`: a single record produces a
/// JSON object, a sequence produces an array of objects with the selection
/// applied to each element independently.
///
/// # Errors
///
/// Returns [`PayloadSerializationError`] if the payload shape disagrees with
/// the descriptor, a record does not serialize to a JSON object, positional
/// selectors are used on a single record, or the record fails to serialize.
///
/// # Example
///
/// ```rust
/// use botenix_client::clients::{serialize, FieldSelection};
/// use botenix_client::model::{FieldSpec, Model, Payload, TypeDescriptor};
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
///
/// #[derive(Serialize, Deserialize)]
/// struct Person {
///     name: String,
///     age: u32,
///     email: String,
/// }
///
/// impl Model for Person {
///     fn schema() -> &'static [FieldSpec] {
///         const FIELDS: &[FieldSpec] = &[
///             FieldSpec::new("name"),
///             FieldSpec::new("age"),
///             FieldSpec::new("email"),
///         ];
///         FIELDS
///     }
/// }
///
/// let person = Person { name: "John".into(), age: 30, email: "a@b.com".into() };
/// let body = serialize(
///     Payload::One(&person),
///     TypeDescriptor::one(),
///     &FieldSelection::new().include(["name", "email"]),
/// )
/// .unwrap();
///
/// assert_eq!(body, json!({"name": "John", "email": "a@b.com"}));
/// ```
pub fn serialize<M: Model>(
    payload: Payload<'_, M>,
    descriptor: TypeDescriptor<M>,
    selection: &FieldSelection,
) -> Result<Value, PayloadSerializationError> {
    let type_name = descriptor.type_name();

    if payload.shape() != descriptor.shape() {
        return Err(PayloadSerializationError::ShapeMismatch {
            type_name,
            expected: descriptor.shape(),
            found: payload.shape(),
        });
    }

    match payload {
        Payload::One(record) => {
            if selection.has_positions() {
                return Err(PayloadSerializationError::PositionalSelector { type_name });
            }
            serialize_record(record, None, type_name, selection).map(Value::Object)
        }
        Payload::Many(records) => records
            .iter()
            .enumerate()
            .filter(|(index, _)| selection.keeps_position(*index))
            .map(|(index, record)| {
                serialize_record(record, Some(index), type_name, selection).map(Value::Object)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
    }
}

fn serialize_record<M: Model>(
    record: &M,
    index: Option<usize>,
    type_name: &'static str,
    selection: &FieldSelection,
) -> Result<Map<String, Value>, PayloadSerializationError> {
    let value = serde_json::to_value(record)
        .map_err(|source| PayloadSerializationError::Serialize { type_name, source })?;

    let Value::Object(fields) = value else {
        return Err(PayloadSerializationError::NotARecord { type_name, index });
    };

    Ok(fields
        .into_iter()
        .filter(|(name, value)| selection.keeps_field(record, name, value))
        .map(|(name, value)| {
            let key = M::field(&name).map_or(name, |spec| {
                spec.wire_name(selection.by_alias).to_string()
            });
            (key, value)
        })
        .collect())
}

/// Produces the effective request body for a call.
///
/// Without a typed payload the caller-supplied `json` passes through
/// unchanged (possibly `None`); with one, the serialized payload replaces it.
///
/// # Errors
///
/// Propagates any [`PayloadSerializationError`] from [`serialize`].
pub fn prepare_body<M: Model>(
    json: Option<Value>,
    typed: Option<(Payload<'_, M>, TypeDescriptor<M>)>,
    selection: &FieldSelection,
) -> Result<Option<Value>, PayloadSerializationError> {
    match typed {
        Some((payload, descriptor)) => serialize(payload, descriptor, selection).map(Some),
        None => Ok(json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldSpec, FieldsSet, Shape};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct Person {
        name: String,
        age: u32,
        email: String,
    }

    impl Model for Person {
        fn schema() -> &'static [FieldSpec] {
            const FIELDS: &[FieldSpec] = &[
                FieldSpec::new("name"),
                FieldSpec::new("age"),
                FieldSpec::new("email"),
            ];
            FIELDS
        }
    }

    fn john() -> Person {
        Person {
            name: "John".to_string(),
            age: 30,
            email: "a@b.com".to_string(),
        }
    }

    /// A contact whose `phone` has no declared default.
    #[derive(Debug, Serialize, Deserialize)]
    struct Contact {
        name: String,
        active: bool,
        phone: Option<String>,
        #[serde(skip)]
        fields_set: FieldsSet,
    }

    fn bool_true() -> Value {
        Value::Bool(true)
    }

    impl Model for Contact {
        fn schema() -> &'static [FieldSpec] {
            const FIELDS: &[FieldSpec] = &[
                FieldSpec::new("name").alias("full_name"),
                FieldSpec::new("active").default_with(bool_true),
                FieldSpec::new("phone"),
            ];
            FIELDS
        }

        fn fields_set(&self) -> Option<&FieldsSet> {
            Some(&self.fields_set)
        }
    }

    #[test]
    fn test_include_keeps_only_named_fields() {
        let person = john();
        let body = serialize(
            Payload::One(&person),
            TypeDescriptor::one(),
            &FieldSelection::new().include(["name", "email"]),
        )
        .unwrap();

        assert_eq!(body, json!({"name": "John", "email": "a@b.com"}));
    }

    #[test]
    fn test_exclude_applies_after_include() {
        let person = john();
        let body = serialize(
            Payload::One(&person),
            TypeDescriptor::one(),
            &FieldSelection::new()
                .include(["name", "email"])
                .exclude(["email"]),
        )
        .unwrap();

        assert_eq!(body, json!({"name": "John"}));
    }

    #[test]
    fn test_defaults_dropped_but_undeclared_null_kept() {
        let contact = Contact {
            name: "John".to_string(),
            active: true,
            phone: None,
            fields_set: ["name"].into_iter().collect(),
        };

        let body = serialize(
            Payload::One(&contact),
            TypeDescriptor::one(),
            &FieldSelection::new().by_alias(true).exclude_defaults(true),
        )
        .unwrap();

        assert_eq!(body, json!({"full_name": "John", "phone": null}));
    }

    #[test]
    fn test_exclude_unset_uses_fields_set() {
        let contact = Contact {
            name: "John".to_string(),
            active: false,
            phone: None,
            fields_set: ["name", "active"].into_iter().collect(),
        };

        let body = serialize(
            Payload::One(&contact),
            TypeDescriptor::one(),
            &FieldSelection::new().exclude_unset(true),
        )
        .unwrap();

        assert_eq!(body, json!({"name": "John", "active": false}));
    }

    #[test]
    fn test_alias_does_not_affect_filtering() {
        let contact = Contact {
            name: "John".to_string(),
            active: true,
            phone: None,
            fields_set: FieldsSet::new(),
        };

        // `exclude` names the canonical field, even when writing by alias.
        let body = serialize(
            Payload::One(&contact),
            TypeDescriptor::one(),
            &FieldSelection::new()
                .exclude(["name"])
                .by_alias(true)
                .exclude_none(true),
        )
        .unwrap();

        assert_eq!(body, json!({"active": true}));

        // An alias in `include` selects nothing.
        let body = serialize(
            Payload::One(&contact),
            TypeDescriptor::one(),
            &FieldSelection::new().include(["full_name"]).by_alias(true),
        )
        .unwrap();

        assert_eq!(body, json!({}));
    }

    #[test]
    fn test_sequence_applies_selection_per_element() {
        let people = vec![
            john(),
            Person {
                name: "Doe".to_string(),
                age: 25,
                email: "d@e.com".to_string(),
            },
        ];

        let body = serialize(
            Payload::Many(&people),
            TypeDescriptor::many(),
            &FieldSelection::new().exclude(["email"]),
        )
        .unwrap();

        assert_eq!(
            body,
            json!([{"name": "John", "age": 30}, {"name": "Doe", "age": 25}])
        );
    }

    #[test]
    fn test_positions_select_sequence_elements() {
        let people = vec![john(), john(), john()];

        let body = serialize(
            Payload::Many(&people),
            TypeDescriptor::many(),
            &FieldSelection::new()
                .include([0_usize, 2])
                .exclude([2_usize]),
        )
        .unwrap();

        assert_eq!(body, json!([{"name": "John", "age": 30, "email": "a@b.com"}]));
    }

    #[test]
    fn test_positions_rejected_for_single_record() {
        let person = john();
        let result = serialize(
            Payload::One(&person),
            TypeDescriptor::one(),
            &FieldSelection::new().include([0_usize]),
        );

        assert!(matches!(
            result,
            Err(PayloadSerializationError::PositionalSelector { .. })
        ));
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let person = john();
        let result = serialize(
            Payload::One(&person),
            TypeDescriptor::many(),
            &FieldSelection::new(),
        );

        assert!(matches!(
            result,
            Err(PayloadSerializationError::ShapeMismatch {
                expected: Shape::Many,
                found: Shape::One,
                ..
            })
        ));
    }

    #[test]
    fn test_non_object_record_is_rejected() {
        #[derive(Serialize, Deserialize)]
        struct Label(String);

        impl Model for Label {
            fn schema() -> &'static [FieldSpec] {
                &[]
            }
        }

        let labels = vec![Label("a".to_string())];
        let result = serialize(
            Payload::Many(&labels),
            TypeDescriptor::many(),
            &FieldSelection::new(),
        );

        assert!(matches!(
            result,
            Err(PayloadSerializationError::NotARecord { index: Some(0), .. })
        ));
    }

    #[test]
    fn test_prepare_body_passes_json_through_without_payload() {
        let raw = json!({"raw": true});
        let body = prepare_body::<Person>(Some(raw.clone()), None, &FieldSelection::new()).unwrap();
        assert_eq!(body, Some(raw));

        let body = prepare_body::<Person>(None, None, &FieldSelection::new()).unwrap();
        assert_eq!(body, None);
    }

    #[test]
    fn test_prepare_body_payload_overrides_json() {
        let person = john();
        let body = prepare_body(
            Some(json!({"raw": true})),
            Some((Payload::One(&person), TypeDescriptor::one())),
            &FieldSelection::new().include(["name"]),
        )
        .unwrap();

        assert_eq!(body, Some(json!({"name": "John"})));
    }
}
