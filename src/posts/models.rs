//! Post request and response records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::attachment::Attachment;
use super::metadata::PostMetadata;
use super::millis_to_datetime;
use crate::model::{FieldSpec, Model};

/// Body of `POST /posts`.
///
/// Optional fields default to `null`; send with `exclude_none` to omit them.
///
/// # Example
///
/// ```rust
/// use botenix_client::posts::PostCreateRequest;
///
/// let post = PostCreateRequest::new("channel-id", "hello")
///     .with_root_id("thread-root");
/// assert_eq!(post.root_id.as_deref(), Some("thread-root"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PostCreateRequest {
    /// Channel to post in.
    pub channel_id: String,

    /// Markdown message text.
    pub message: String,

    /// Root post ID when replying in a thread.
    pub root_id: Option<String>,

    /// IDs of previously uploaded files.
    pub file_ids: Option<Vec<String>>,

    /// Extra JSON properties.
    pub props: Option<Map<String, Value>>,

    /// Post metadata.
    pub metadata: Option<PostMetadata>,
}

impl PostCreateRequest {
    /// Creates a top-level post.
    #[must_use]
    pub fn new(channel_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Makes this post a reply in the thread rooted at `root_id`.
    #[must_use]
    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = Some(root_id.into());
        self
    }

    /// Attaches previously uploaded files.
    #[must_use]
    pub fn with_file_ids<I, S>(mut self, file_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_ids = Some(file_ids.into_iter().map(Into::into).collect());
        self
    }

    /// Sets one extra JSON property.
    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets `props.attachments`.
    ///
    /// # Errors
    ///
    /// Returns an error if the attachments cannot be converted to JSON.
    pub fn with_attachments(self, attachments: &[Attachment]) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(attachments)?;
        Ok(self.with_prop(ATTACHMENTS_PROP, value))
    }
}

const ATTACHMENTS_PROP: &str = "attachments";

impl Model for PostCreateRequest {
    fn schema() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::new("channel_id"),
            FieldSpec::new("message"),
            FieldSpec::new("root_id").default_null(),
            FieldSpec::new("file_ids").default_null(),
            FieldSpec::new("props").default_null(),
            FieldSpec::new("metadata").default_null(),
        ];
        FIELDS
    }
}

/// A post as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Unique post ID.
    pub id: String,

    /// Creation time in epoch milliseconds.
    pub create_at: i64,

    /// Last update time in epoch milliseconds.
    pub update_at: i64,

    /// Deletion time in epoch milliseconds, `0` if not deleted.
    pub delete_at: i64,

    /// Last edit time in epoch milliseconds, `0` if never edited.
    pub edit_at: i64,

    /// Author's user ID.
    pub user_id: String,

    /// Channel the post belongs to.
    pub channel_id: String,

    /// Markdown message text.
    pub message: String,

    /// Root post ID for thread replies.
    pub root_id: Option<String>,

    /// ID of the original post if this is an edit.
    pub original_id: Option<String>,

    /// System or custom post type; empty for regular posts.
    #[serde(rename = "type", default)]
    pub post_type: String,

    /// Temporary ID assigned while the post was pending.
    pub pending_post_id: Option<String>,

    /// Hashtags found in the message.
    pub hashtags: Option<String>,

    /// IDs of attached files.
    pub file_ids: Option<Vec<String>>,

    /// Extra JSON properties.
    pub props: Option<Map<String, Value>>,

    /// Post metadata.
    pub metadata: Option<PostMetadata>,
}

fn empty_string() -> Value {
    Value::String(String::new())
}

impl Model for Post {
    fn schema() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::new("id"),
            FieldSpec::new("create_at"),
            FieldSpec::new("update_at"),
            FieldSpec::new("delete_at"),
            FieldSpec::new("edit_at"),
            FieldSpec::new("user_id"),
            FieldSpec::new("channel_id"),
            FieldSpec::new("message"),
            FieldSpec::new("root_id").default_null(),
            FieldSpec::new("original_id").default_null(),
            FieldSpec::new("type").default_with(empty_string),
            FieldSpec::new("pending_post_id").default_null(),
            FieldSpec::new("hashtags").default_null(),
            FieldSpec::new("file_ids").default_null(),
            FieldSpec::new("props").default_null(),
            FieldSpec::new("metadata").default_null(),
        ];
        FIELDS
    }
}

impl Post {
    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.create_at)
    }

    /// Returns the last update time.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.update_at)
    }

    /// Returns the deletion time, or `None` if the post is not deleted.
    #[must_use]
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        (self.delete_at > 0)
            .then(|| millis_to_datetime(self.delete_at))
            .flatten()
    }

    /// Returns the last edit time, or `None` if the post was never edited.
    #[must_use]
    pub fn edited_at(&self) -> Option<DateTime<Utc>> {
        (self.edit_at > 0)
            .then(|| millis_to_datetime(self.edit_at))
            .flatten()
    }

    /// Returns the attachments stored in `props.attachments`.
    ///
    /// # Errors
    ///
    /// Returns an error if the property is present but is not a list of
    /// valid attachments.
    pub fn attachments(&self) -> Result<Vec<Attachment>, serde_json::Error> {
        match self.props.as_ref().and_then(|props| props.get(ATTACHMENTS_PROP)) {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(value) => Vec::<Attachment>::deserialize(value),
        }
    }

    /// Returns `true` if this post is a reply in a thread.
    #[must_use]
    pub fn is_reply(&self) -> bool {
        self.root_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}
