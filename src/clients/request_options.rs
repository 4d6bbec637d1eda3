//! Per-call options for the verb dispatch pipeline.

use std::fmt;

use serde_json::Value;

use crate::clients::errors::PayloadSerializationError;
use crate::clients::http_request::{FilePart, QueryParams, RequestFiles};
use crate::clients::serializer::{serialize, FieldSelection, Selector};
use crate::model::{Model, Payload, TypeDescriptor};

type SerializeFn<'a> =
    Box<dyn FnOnce(&FieldSelection) -> Result<Value, PayloadSerializationError> + Send + 'a>;

/// Options for one call through [`ApiClient`](crate::clients::ApiClient).
///
/// `R` is the record type the response is validated into. It defaults to
/// [`Value`], which is what an untyped call (no response descriptor) yields
/// anyway.
///
/// A typed payload is serialized lazily, right before the request is built,
/// and replaces any raw [`json`](Self::json) body.
///
/// # Example
///
/// ```rust,ignore
/// use botenix_client::{RequestOptions, TypeDescriptor};
///
/// let options = RequestOptions::new()
///     .params([("page", "0")])
///     .payload(&new_post, TypeDescriptor::one())
///     .exclude_none(true)
///     .response(TypeDescriptor::<Post>::one());
/// ```
#[must_use]
pub struct RequestOptions<'a, R = Value> {
    params: Option<QueryParams>,
    json: Option<Value>,
    payload: Option<SerializeFn<'a>>,
    payload_type: Option<&'static str>,
    files: Option<RequestFiles>,
    selection: FieldSelection,
    response: Option<TypeDescriptor<R>>,
}

// Verify RequestOptions is Send at compile time
const _: fn() = || {
    const fn assert_send<T: Send>() {}
    assert_send::<RequestOptions<'static>>();
};

impl RequestOptions<'_> {
    /// Creates empty options: no query, no body, untyped response.
    pub fn new() -> Self {
        Self {
            params: None,
            json: None,
            payload: None,
            payload_type: None,
            files: None,
            selection: FieldSelection::new(),
            response: None,
        }
    }
}

impl Default for RequestOptions<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, R> RequestOptions<'a, R> {
    /// Sets the query parameters.
    pub fn params(mut self, params: impl Into<QueryParams>) -> Self {
        self.params = Some(params.into());
        self
    }

    /// Sets a raw JSON body.
    ///
    /// Ignored when a typed [`payload`](Self::payload) is also set.
    pub fn json(mut self, body: impl Into<Value>) -> Self {
        self.json = Some(body.into());
        self
    }

    /// Sets a typed payload and the descriptor it must conform to.
    ///
    /// Pass `&record` with [`TypeDescriptor::one`] or `&records[..]` with
    /// [`TypeDescriptor::many`]; a `&Vec<M>` needs the descriptor's record
    /// type spelled out. A shape disagreement surfaces
    /// as [`PayloadSerializationError::ShapeMismatch`] when the call runs.
    pub fn payload<M>(
        mut self,
        payload: impl Into<Payload<'a, M>>,
        descriptor: TypeDescriptor<M>,
    ) -> Self
    where
        M: Model + Sync + 'a,
    {
        let payload = payload.into();
        self.payload_type = Some(descriptor.type_name());
        self.payload = Some(Box::new(move |selection: &FieldSelection| {
            serialize(payload, descriptor, selection)
        }));
        self
    }

    /// Sets multipart file parts, replacing any previous ones.
    pub fn files(mut self, files: RequestFiles) -> Self {
        self.files = Some(files);
        self
    }

    /// Adds one named multipart file part.
    pub fn file(mut self, name: impl Into<String>, part: FilePart) -> Self {
        self.files
            .get_or_insert_with(Vec::new)
            .push((name.into(), part));
        self
    }

    /// Replaces the whole field selection.
    pub fn selection(mut self, selection: FieldSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Keeps only the selected fields (or sequence positions).
    pub fn include(mut self, selector: impl Into<Selector>) -> Self {
        self.selection = self.selection.include(selector);
        self
    }

    /// Drops the selected fields (or sequence positions).
    pub fn exclude(mut self, selector: impl Into<Selector>) -> Self {
        self.selection = self.selection.exclude(selector);
        self
    }

    /// Renders keys with their wire aliases.
    pub fn by_alias(mut self, enabled: bool) -> Self {
        self.selection = self.selection.by_alias(enabled);
        self
    }

    /// Drops fields the caller never assigned.
    pub fn exclude_unset(mut self, enabled: bool) -> Self {
        self.selection = self.selection.exclude_unset(enabled);
        self
    }

    /// Drops fields equal to their declared default.
    pub fn exclude_defaults(mut self, enabled: bool) -> Self {
        self.selection = self.selection.exclude_defaults(enabled);
        self
    }

    /// Drops fields whose value is `null`.
    pub fn exclude_none(mut self, enabled: bool) -> Self {
        self.selection = self.selection.exclude_none(enabled);
        self
    }

    /// Sets the response descriptor, changing the result record type.
    pub fn response<T>(self, descriptor: TypeDescriptor<T>) -> RequestOptions<'a, T> {
        RequestOptions {
            params: self.params,
            json: self.json,
            payload: self.payload,
            payload_type: self.payload_type,
            files: self.files,
            selection: self.selection,
            response: Some(descriptor),
        }
    }

    /// Returns the type name of the typed payload, if one is set.
    #[must_use]
    pub const fn payload_type(&self) -> Option<&'static str> {
        self.payload_type
    }

    /// Returns the response descriptor, if one is set.
    #[must_use]
    pub const fn response_descriptor(&self) -> Option<TypeDescriptor<R>> {
        self.response
    }

    /// Splits the options into the parts the pipeline consumes.
    ///
    /// The typed payload (if any) is serialized here and replaces the raw
    /// JSON body.
    pub(crate) fn into_parts(self) -> Result<PreparedOptions<R>, PayloadSerializationError> {
        let body = match self.payload {
            Some(serialize_payload) => Some(serialize_payload(&self.selection)?),
            None => self.json,
        };

        Ok(PreparedOptions {
            params: self.params,
            body,
            files: self.files,
            response: self.response,
        })
    }
}

impl<R> fmt::Debug for RequestOptions<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("params", &self.params)
            .field("json", &self.json)
            .field("payload", &self.payload_type)
            .field("files", &self.files.as_ref().map(Vec::len))
            .field("selection", &self.selection)
            .field("response", &self.response)
            .finish()
    }
}

/// Options after payload serialization.
pub(crate) struct PreparedOptions<R> {
    pub params: Option<QueryParams>,
    pub body: Option<Value>,
    pub files: Option<RequestFiles>,
    pub response: Option<TypeDescriptor<R>>,
}
