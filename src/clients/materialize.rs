//! Response decoding and typed validation.

use std::any::type_name;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::classify::ContentKind;
use crate::clients::errors::{
    HttpError, ResponseDecodeError, ResponseValidationError, ValidationIssue,
};
use crate::model::{Shape, TypeDescriptor};

/// The outcome of a call.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedResult<T> {
    /// A single validated record.
    One(T),
    /// Validated records, in the order of the JSON array.
    Many(Vec<T>),
    /// Decoded JSON, returned when no response descriptor was given.
    Json(Value),
    /// The raw body of a non-JSON response.
    Bytes(Bytes),
}

impl<T> TypedResult<T> {
    /// Returns the single record, if this is [`TypedResult::One`].
    #[must_use]
    pub fn into_one(self) -> Option<T> {
        match self {
            Self::One(record) => Some(record),
            _ => None,
        }
    }

    /// Returns the records, if this is [`TypedResult::Many`].
    #[must_use]
    pub fn into_many(self) -> Option<Vec<T>> {
        match self {
            Self::Many(records) => Some(records),
            _ => None,
        }
    }

    /// Returns the decoded JSON, if this is [`TypedResult::Json`].
    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the raw body, if this is [`TypedResult::Bytes`].
    #[must_use]
    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the single record or a validation error naming what arrived instead.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseValidationError`] for any variant other than `One`.
    pub fn into_record(self) -> Result<T, ResponseValidationError> {
        match self {
            Self::One(record) => Ok(record),
            other => Err(other.unexpected("a single record")),
        }
    }

    /// Returns the records or a validation error naming what arrived instead.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseValidationError`] for any variant other than `Many`.
    pub fn into_records(self) -> Result<Vec<T>, ResponseValidationError> {
        match self {
            Self::Many(records) => Ok(records),
            other => Err(other.unexpected("a sequence of records")),
        }
    }

    fn unexpected(&self, expected: &str) -> ResponseValidationError {
        let found = match self {
            Self::One(_) => "a single record",
            Self::Many(_) => "a sequence of records",
            Self::Json(_) => "untyped JSON",
            Self::Bytes(_) => "a non-JSON body",
        };
        ResponseValidationError {
            type_name: type_name::<T>(),
            issues: vec![ValidationIssue {
                path: ".".to_string(),
                message: format!("expected {expected}, got {found}"),
            }],
        }
    }
}

/// Turns a response body into the call result.
///
/// - Opaque bodies are returned as [`TypedResult::Bytes`]; the descriptor is ignored.
/// - Structured bodies are decoded; without a descriptor the JSON is returned
///   as [`TypedResult::Json`].
/// - With a descriptor, a `One` expects a JSON object and a `Many` expects a
///   JSON array whose elements are validated independently, keeping order.
///
/// # Errors
///
/// - [`HttpError::Decode`] if a structured body is not valid JSON
/// - [`HttpError::Validation`] if the JSON does not match the descriptor
pub fn materialize<T: DeserializeOwned>(
    body: Bytes,
    kind: ContentKind,
    content_type: &str,
    descriptor: Option<TypeDescriptor<T>>,
) -> Result<TypedResult<T>, HttpError> {
    if kind == ContentKind::Opaque {
        return Ok(TypedResult::Bytes(body));
    }

    let value: Value = serde_json::from_slice(&body).map_err(|source| ResponseDecodeError {
        content_type: content_type.to_string(),
        source,
    })?;

    let Some(descriptor) = descriptor else {
        return Ok(TypedResult::Json(value));
    };

    validate(value, descriptor).map_err(HttpError::from)
}

/// Validates decoded JSON against a descriptor.
///
/// # Errors
///
/// Returns [`ResponseValidationError`] with one issue per failing value.
pub fn validate<T: DeserializeOwned>(
    value: Value,
    descriptor: TypeDescriptor<T>,
) -> Result<TypedResult<T>, ResponseValidationError> {
    let type_name = descriptor.type_name();
    let shape_error = |expected: &str, value: &Value| ResponseValidationError {
        type_name,
        issues: vec![ValidationIssue {
            path: ".".to_string(),
            message: format!("expected {expected}, got {}", json_kind(value)),
        }],
    };

    match descriptor.shape() {
        Shape::One => {
            if !value.is_object() {
                return Err(shape_error("a JSON object", &value));
            }
            validate_record(value, None)
                .map(TypedResult::One)
                .map_err(|issue| ResponseValidationError {
                    type_name,
                    issues: vec![issue],
                })
        }
        Shape::Many => {
            let elements = match value {
                Value::Array(elements) => elements,
                other => return Err(shape_error("a JSON array", &other)),
            };

            let mut records = Vec::with_capacity(elements.len());
            let mut issues = Vec::new();
            for (index, element) in elements.into_iter().enumerate() {
                match validate_record(element, Some(index)) {
                    Ok(record) => records.push(record),
                    Err(issue) => issues.push(issue),
                }
            }

            if issues.is_empty() {
                Ok(TypedResult::Many(records))
            } else {
                Err(ResponseValidationError { type_name, issues })
            }
        }
    }
}

fn validate_record<T: DeserializeOwned>(
    value: Value,
    index: Option<usize>,
) -> Result<T, ValidationIssue> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let inner = err.path().to_string();
        let path = match index {
            Some(i) if inner == "." => format!("[{i}]"),
            Some(i) => format!("[{i}].{inner}"),
            None => inner,
        };
        ValidationIssue {
            path,
            message: err.into_inner().to_string(),
        }
    })
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a JSON array",
        Value::Object(_) => "a JSON object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        id: u32,
        name: String,
        age: u32,
    }

    fn json_body(value: &Value) -> Bytes {
        Bytes::from(serde_json::to_vec(value).unwrap())
    }

    #[test]
    fn test_opaque_body_returned_as_bytes_even_if_json() {
        let body = Bytes::from_static(br#"{"id":1,"name":"John","age":30}"#);
        let result = materialize(
            body.clone(),
            ContentKind::Opaque,
            "text/plain",
            Some(TypeDescriptor::<Person>::one()),
        )
        .unwrap();

        assert_eq!(result, TypedResult::Bytes(body));
    }

    #[test]
    fn test_structured_without_descriptor_returns_json() {
        let value = json!([{"a": 1}, {"b": 2}]);
        let result = materialize::<Value>(
            json_body(&value),
            ContentKind::Structured,
            "application/json",
            None,
        )
        .unwrap();

        assert_eq!(result, TypedResult::Json(value));
    }

    #[test]
    fn test_single_record_validation() {
        let value = json!({"id": 1, "name": "John", "age": 30});
        let result = materialize(
            json_body(&value),
            ContentKind::Structured,
            "application/json",
            Some(TypeDescriptor::<Person>::one()),
        )
        .unwrap();

        assert_eq!(
            result.into_record().unwrap(),
            Person {
                id: 1,
                name: "John".to_string(),
                age: 30
            }
        );
    }

    #[test]
    fn test_sequence_preserves_order() {
        let value = json!([
            {"id": 2, "name": "Doe", "age": 25},
            {"id": 1, "name": "John", "age": 30},
            {"id": 3, "name": "Roe", "age": 41},
        ]);
        let records = validate(value, TypeDescriptor::<Person>::many())
            .unwrap()
            .into_records()
            .unwrap();

        let ids: Vec<_> = records.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_missing_fields_raise_validation_error() {
        let result = validate(json!({"invalid": "data"}), TypeDescriptor::<Person>::one());

        let error = result.unwrap_err();
        assert_eq!(error.issues.len(), 1);
        assert!(error.issues[0].message.contains("missing field"));
        assert!(error.type_name.contains("Person"));
    }

    #[test]
    fn test_sequence_reports_each_failing_element() {
        let value = json!([
            {"id": 1, "name": "John", "age": 30},
            {"id": 2, "name": "Doe", "age": "old"},
            {"id": 3},
        ]);
        let error = validate(value, TypeDescriptor::<Person>::many()).unwrap_err();

        assert_eq!(error.issues.len(), 2);
        assert_eq!(error.issues[0].path, "[1].age");
        assert!(error.issues[1].path.starts_with("[2]"));
    }

    #[test]
    fn test_shape_mismatch_is_validation_error() {
        let error = validate(
            json!([{"id": 1, "name": "John", "age": 30}]),
            TypeDescriptor::<Person>::one(),
        )
        .unwrap_err();
        assert!(error.issues[0].message.contains("expected a JSON object"));

        let error = validate(
            json!({"id": 1, "name": "John", "age": 30}),
            TypeDescriptor::<Person>::many(),
        )
        .unwrap_err();
        assert!(error.issues[0].message.contains("expected a JSON array"));
    }

    #[test]
    fn test_empty_sequence_is_valid() {
        let result = validate(json!([]), TypeDescriptor::<Person>::many()).unwrap();
        assert_eq!(result, TypedResult::Many(vec![]));
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let result = materialize::<Value>(
            Bytes::from_static(b"not json"),
            ContentKind::Structured,
            "application/json",
            None,
        );

        assert!(matches!(result, Err(HttpError::Decode(_))));
    }

    #[test]
    fn test_into_record_rejects_other_variants() {
        let result: TypedResult<Person> = TypedResult::Bytes(Bytes::from_static(b"x"));
        let error = result.into_record().unwrap_err();
        assert!(error.issues[0].message.contains("got a non-JSON body"));
    }
}
