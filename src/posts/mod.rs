//! Posts API.
//!
//! [`PostsClient`] creates, fetches, and deletes posts on top of the generic
//! request pipeline. Rich posts carry [`Attachment`] records in
//! `props.attachments`. Timestamps arrive as epoch milliseconds; the records
//! expose them as [`chrono`] values through accessor methods.

mod attachment;
mod client;
mod metadata;
mod models;

pub use attachment::{
    ActionIntegration, ActionType, Attachment, AttachmentAction, AttachmentColor, AttachmentError,
    AttachmentField, AttachmentTimestamp, AttachmentUrl,
};
pub use client::PostsClient;
pub use metadata::{
    Emoji, FileInfo, PostAcknowledgement, PostEmbed, PostEmbedType, PostImage, PostMetadata,
    Priority, Reaction,
};
pub use models::{Post, PostCreateRequest};

use chrono::{DateTime, TimeZone, Utc};

/// Converts epoch milliseconds into a UTC timestamp.
///
/// Returns `None` when the value is out of range.
#[must_use]
pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}
