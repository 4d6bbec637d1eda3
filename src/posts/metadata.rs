//! Records attached to a post's metadata.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::millis_to_datetime;

/// Kind of embedded content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PostEmbedType {
    /// An inline image.
    Image,
    /// A legacy message attachment.
    MessageAttachment,
    /// An OpenGraph link preview.
    Opengraph,
    /// A plain link.
    Link,
    /// A permalink to another post.
    Permalink,
    /// A boards card.
    Boards,
}

/// Embedded content on a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostEmbed {
    /// Type of embedded content.
    #[serde(rename = "type")]
    pub embed_type: PostEmbedType,

    /// URL of the embedded content.
    pub url: Option<String>,

    /// Additional data for the embedded content.
    pub data: Option<Value>,
}

/// A custom emoji used in or reacting to a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Emoji {
    /// Unique ID of the emoji.
    pub id: String,

    /// ID of the user who created the emoji.
    pub user_id: Option<String>,

    /// Name of the emoji.
    pub name: Option<String>,

    /// Creation time in epoch milliseconds.
    pub create_at: i64,

    /// Last update time in epoch milliseconds.
    pub update_at: i64,

    /// Deletion time in epoch milliseconds, `0` if not deleted.
    pub delete_at: i64,
}

/// A file attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileInfo {
    /// Unique ID of the file.
    pub id: String,

    /// ID of the uploader.
    pub user_id: String,

    /// ID of the post the file belongs to.
    pub post_id: Option<String>,

    /// ID of the channel the file was uploaded to.
    pub channel_id: String,

    /// Creation time in epoch milliseconds.
    pub create_at: i64,

    /// Last update time in epoch milliseconds.
    pub update_at: i64,

    /// Deletion time in epoch milliseconds, `0` if not deleted.
    pub delete_at: i64,

    /// File name.
    pub name: String,

    /// File extension, without the dot.
    pub extension: String,

    /// Size in bytes.
    pub size: u64,

    /// MIME type.
    pub mime_type: String,

    /// Image width in pixels, if applicable.
    pub width: Option<u32>,

    /// Image height in pixels, if applicable.
    pub height: Option<u32>,

    /// Whether a preview image exists.
    pub has_preview_image: Option<bool>,

    /// Base64-encoded mini preview.
    pub mini_preview: Option<String>,

    /// ID for files originating from a remote cluster.
    pub remote_id: Option<String>,

    /// Whether the file is archived.
    #[serde(default)]
    pub archived: bool,
}

impl FileInfo {
    /// Returns the upload time.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.create_at)
    }
}

/// A reaction on a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reaction {
    /// ID of the reacting user.
    pub user_id: String,

    /// ID of the post reacted to.
    pub post_id: String,

    /// Name of the emoji used.
    pub emoji_name: String,

    /// ID of the post's channel.
    pub channel_id: String,

    /// Creation time in epoch milliseconds.
    pub create_at: Option<i64>,

    /// Last update time in epoch milliseconds.
    pub update_at: Option<i64>,

    /// Deletion time in epoch milliseconds.
    pub delete_at: Option<i64>,

    /// ID for reactions originating from a remote cluster.
    pub remote_id: Option<String>,
}

impl Reaction {
    /// Returns the reaction time, if known.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.create_at.and_then(millis_to_datetime)
    }
}

/// Priority and notification settings of a post.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Priority {
    /// Priority label, e.g. `important` or `urgent`.
    pub priority: Option<String>,

    /// Whether acknowledgements were requested.
    pub requested_ack: Option<bool>,

    /// Whether notifications are persistent.
    pub persistent_notifications: Option<bool>,
}

/// Dimensions of an external image referenced by a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostImage {
    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,

    /// Image format, e.g. `png`.
    pub format: String,

    /// Number of frames, `0` if not animated.
    #[serde(default)]
    pub frame_count: u32,
}

/// A user's acknowledgement of a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostAcknowledgement {
    /// ID of the acknowledging user.
    pub user_id: String,

    /// ID of the acknowledged post.
    pub post_id: String,

    /// Acknowledgement time in epoch milliseconds.
    pub acknowledged_at: i64,
}

impl PostAcknowledgement {
    /// Returns the acknowledgement time.
    #[must_use]
    pub fn acknowledged(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.acknowledged_at)
    }
}

/// Metadata the server attaches to a post.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PostMetadata {
    /// Embedded content.
    #[serde(default)]
    pub embeds: Vec<PostEmbed>,

    /// Custom emojis used in or reacting to the post.
    #[serde(default)]
    pub emojis: Vec<Emoji>,

    /// Attached files.
    #[serde(default)]
    pub files: Vec<FileInfo>,

    /// External image dimensions, keyed by URL.
    #[serde(default)]
    pub images: BTreeMap<String, PostImage>,

    /// Reactions on the post.
    #[serde(default)]
    pub reactions: Vec<Reaction>,

    /// Priority settings.
    pub priority: Option<Priority>,

    /// Acknowledgements of the post.
    #[serde(default)]
    pub acknowledgements: Vec<PostAcknowledgement>,
}
