//! Message attachments.
//!
//! Bots send rich posts by putting a list of [`Attachment`] records under
//! `props.attachments`. Colors and links are validated when they are built,
//! so a malformed attachment never reaches the wire.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::BaseUrl;

/// Errors raised while building an attachment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    /// The color is not a recognized hex code, `rgb()` triple, or color name.
    #[error("Invalid attachment color '{value}'. Use a hex code ('#ff0000'), 'rgb(255, 0, 0)', or a basic color name.")]
    InvalidColor {
        /// The rejected color.
        value: String,
    },

    /// A link field is not an absolute http(s) URL.
    #[error("Invalid attachment URL '{value}'. Links must be absolute http or https URLs.")]
    InvalidUrl {
        /// The rejected URL.
        value: String,
    },
}

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0x00, 0x00, 0x00]),
    ("silver", [0xc0, 0xc0, 0xc0]),
    ("gray", [0x80, 0x80, 0x80]),
    ("grey", [0x80, 0x80, 0x80]),
    ("white", [0xff, 0xff, 0xff]),
    ("maroon", [0x80, 0x00, 0x00]),
    ("red", [0xff, 0x00, 0x00]),
    ("purple", [0x80, 0x00, 0x80]),
    ("fuchsia", [0xff, 0x00, 0xff]),
    ("green", [0x00, 0x80, 0x00]),
    ("lime", [0x00, 0xff, 0x00]),
    ("olive", [0x80, 0x80, 0x00]),
    ("yellow", [0xff, 0xff, 0x00]),
    ("navy", [0x00, 0x00, 0x80]),
    ("blue", [0x00, 0x00, 0xff]),
    ("teal", [0x00, 0x80, 0x80]),
    ("aqua", [0x00, 0xff, 0xff]),
    ("orange", [0xff, 0xa5, 0x00]),
];

/// An attachment border color, normalized to a lower-case hex code.
///
/// The short `#rgb` form is used whenever it represents the color exactly.
///
/// # Example
///
/// ```rust
/// use botenix_client::posts::AttachmentColor;
///
/// assert_eq!(AttachmentColor::new("red").unwrap().as_ref(), "#f00");
/// assert_eq!(AttachmentColor::new("#3A7BD5").unwrap().as_ref(), "#3a7bd5");
/// assert_eq!(AttachmentColor::new("rgb(0, 128, 0)").unwrap().as_ref(), "#008000");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentColor(String);

impl AttachmentColor {
    /// Parses and normalizes a color.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::InvalidColor`] if the color cannot be parsed.
    pub fn new(color: impl AsRef<str>) -> Result<Self, AttachmentError> {
        let raw = color.as_ref();
        let normalized = raw.trim().to_ascii_lowercase();
        parse_rgb(&normalized)
            .map(Self::from_rgb)
            .ok_or_else(|| AttachmentError::InvalidColor {
                value: raw.to_string(),
            })
    }

    /// Creates a color from its red, green, and blue channels.
    #[must_use]
    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        let short = [r, g, b].iter().all(|c| c >> 4 == c & 0x0f);
        if short {
            Self(format!("#{:x}{:x}{:x}", r & 0x0f, g & 0x0f, b & 0x0f))
        } else {
            Self(format!("#{r:02x}{g:02x}{b:02x}"))
        }
    }
}

fn parse_rgb(color: &str) -> Option<[u8; 3]> {
    if let Some((_, rgb)) = NAMED_COLORS.iter().find(|(name, _)| *name == color) {
        return Some(*rgb);
    }

    if let Some(inner) = color
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let channels = inner
            .split(',')
            .map(|c| c.trim().parse::<u8>().ok())
            .collect::<Option<Vec<_>>>()?;
        return <[u8; 3]>::try_from(channels).ok();
    }

    let hex = color
        .strip_prefix('#')
        .or_else(|| color.strip_prefix("0x"))
        .unwrap_or(color);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
    match hex.len() {
        3 => Some([digit(0)? * 17, digit(1)? * 17, digit(2)? * 17]),
        6 => Some([
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ]),
        _ => None,
    }
}

impl AsRef<str> for AttachmentColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttachmentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AttachmentColor {
    type Err = AttachmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for AttachmentColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AttachmentColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated absolute http(s) link used by attachment fields.
///
/// # Example
///
/// ```rust
/// use botenix_client::posts::AttachmentUrl;
///
/// let url = AttachmentUrl::new("https://ci.example.com/builds/42").unwrap();
/// assert_eq!(url.as_ref(), "https://ci.example.com/builds/42");
/// assert!(AttachmentUrl::new("builds/42").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentUrl(String);

impl AttachmentUrl {
    /// Validates a link.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::InvalidUrl`] if the link has no http(s)
    /// scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, AttachmentError> {
        let url = url.into().trim().to_string();
        if BaseUrl::new(url.as_str()).is_err() {
            return Err(AttachmentError::InvalidUrl { value: url });
        }
        Ok(Self(url))
    }
}

impl AsRef<str> for AttachmentUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for AttachmentUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AttachmentUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// Empty strings and `null` both read as "no link".
fn optional_url<'de, D>(deserializer: D) -> Result<Option<AttachmentUrl>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => {
            AttachmentUrl::new(s).map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

/// Empty strings and `null` both read as "no color".
fn optional_color<'de, D>(deserializer: D) -> Result<Option<AttachmentColor>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => {
            AttachmentColor::new(s).map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

/// A timestamp shown in the attachment footer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttachmentTimestamp {
    /// Epoch seconds.
    Epoch(i64),
    /// Free-form text.
    Text(String),
}

/// A title/value pair rendered in the attachment body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttachmentField {
    /// Field title.
    pub title: String,

    /// Field value; any JSON value is accepted.
    pub value: Value,

    /// Whether the field is short enough to display side by side.
    #[serde(default)]
    pub short: bool,
}

impl AttachmentField {
    /// Creates a full-width field.
    #[must_use]
    pub fn new(title: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: false,
        }
    }

    /// Marks the field as short.
    #[must_use]
    pub const fn short(mut self, short: bool) -> Self {
        self.short = short;
        self
    }
}

/// Kind of interactive action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// A clickable button.
    Button,
    /// A drop-down menu.
    Select,
}

/// Where the server posts an action's callback.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ActionIntegration {
    /// Callback URL.
    #[serde(default)]
    pub url: String,

    /// Context echoed back in the callback.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub context: Map<String, Value>,
}

/// An interactive button or menu inside an attachment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttachmentAction {
    /// Action ID, also the last segment of its callback URL.
    pub id: String,

    /// Label shown to users.
    pub name: String,

    /// Button or select.
    #[serde(rename = "type")]
    pub action_type: ActionType,

    /// Callback target.
    #[serde(default)]
    pub integration: ActionIntegration,

    /// Remaining action properties, such as `style` or `options`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AttachmentAction {
    /// Creates a button.
    #[must_use]
    pub fn button(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, ActionType::Button)
    }

    /// Creates a drop-down menu.
    #[must_use]
    pub fn select(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, ActionType::Select)
    }

    fn new(id: impl Into<String>, name: impl Into<String>, action_type: ActionType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            action_type,
            integration: ActionIntegration::default(),
            extra: Map::new(),
        }
    }

    /// Adds one entry to the callback context.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.integration.context.insert(key.into(), value.into());
        self
    }

    /// Sets one extra action property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A rich message attachment.
///
/// # Example
///
/// ```rust
/// use botenix_client::posts::{Attachment, AttachmentColor, AttachmentField};
///
/// let attachment = Attachment::new()
///     .title("Build #42")
///     .color(AttachmentColor::new("green").unwrap())
///     .field(AttachmentField::new("Duration", "3m").short(true));
///
/// let json = serde_json::to_value(&attachment).unwrap();
/// assert_eq!(json["color"], "#008000");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Attachment {
    /// Attachment ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Plain-text summary for clients that cannot render attachments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,

    /// Border color.
    #[serde(
        default,
        deserialize_with = "optional_color",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<AttachmentColor>,

    /// Text shown above the attachment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,

    /// Author name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,

    /// Link on the author name.
    #[serde(
        default,
        deserialize_with = "optional_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub author_link: Option<AttachmentUrl>,

    /// Author icon.
    #[serde(
        default,
        deserialize_with = "optional_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub author_icon: Option<AttachmentUrl>,

    /// Title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Link on the title.
    #[serde(
        default,
        deserialize_with = "optional_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub title_link: Option<AttachmentUrl>,

    /// Main text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Title/value pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,

    /// Full-size image.
    #[serde(
        default,
        deserialize_with = "optional_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<AttachmentUrl>,

    /// Thumbnail image.
    #[serde(
        default,
        deserialize_with = "optional_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumb_url: Option<AttachmentUrl>,

    /// Footer text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,

    /// Footer icon.
    #[serde(
        default,
        deserialize_with = "optional_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub footer_icon: Option<AttachmentUrl>,

    /// Footer timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<AttachmentTimestamp>,

    /// Interactive buttons and menus.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<AttachmentAction>,
}

impl Attachment {
    /// Creates an empty attachment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the main text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the text shown above the attachment.
    #[must_use]
    pub fn pretext(mut self, pretext: impl Into<String>) -> Self {
        self.pretext = Some(pretext.into());
        self
    }

    /// Sets the fallback text.
    #[must_use]
    pub fn fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the title link.
    #[must_use]
    pub fn title_link(mut self, link: AttachmentUrl) -> Self {
        self.title_link = Some(link);
        self
    }

    /// Sets the border color.
    #[must_use]
    pub fn color(mut self, color: AttachmentColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the author name, link, and icon.
    #[must_use]
    pub fn author(
        mut self,
        name: impl Into<String>,
        link: Option<AttachmentUrl>,
        icon: Option<AttachmentUrl>,
    ) -> Self {
        self.author_name = Some(name.into());
        self.author_link = link;
        self.author_icon = icon;
        self
    }

    /// Sets the full-size image.
    #[must_use]
    pub fn image_url(mut self, url: AttachmentUrl) -> Self {
        self.image_url = Some(url);
        self
    }

    /// Sets the thumbnail image.
    #[must_use]
    pub fn thumb_url(mut self, url: AttachmentUrl) -> Self {
        self.thumb_url = Some(url);
        self
    }

    /// Sets the footer text and icon.
    #[must_use]
    pub fn footer(mut self, footer: impl Into<String>, icon: Option<AttachmentUrl>) -> Self {
        self.footer = Some(footer.into());
        self.footer_icon = icon;
        self
    }

    /// Sets the footer timestamp.
    #[must_use]
    pub fn timestamp(mut self, timestamp: AttachmentTimestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Appends a title/value field.
    #[must_use]
    pub fn field(mut self, field: AttachmentField) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends an interactive action.
    #[must_use]
    pub fn action(mut self, action: AttachmentAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Points every action's callback at `webhook_url`.
    ///
    /// Each action's URL becomes `<webhook_url>/<action id>` with no trailing
    /// slash.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::InvalidUrl`] if `webhook_url` is not an
    /// absolute http(s) URL.
    pub fn prepare_integration(&mut self, webhook_url: &str) -> Result<(), AttachmentError> {
        let base = BaseUrl::new(webhook_url).map_err(|_| AttachmentError::InvalidUrl {
            value: webhook_url.to_string(),
        })?;
        for action in &mut self.actions {
            action.integration.url = base.join(&action.id).trim_end_matches('/').to_string();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_color_normalizes_to_hex() {
        assert_eq!(AttachmentColor::new("red").unwrap().as_ref(), "#f00");
        assert_eq!(AttachmentColor::new("Purple").unwrap().as_ref(), "#800080");
        assert_eq!(AttachmentColor::new("#FF8800").unwrap().as_ref(), "#f80");
        assert_eq!(AttachmentColor::new("3a7bd5").unwrap().as_ref(), "#3a7bd5");
        assert_eq!(AttachmentColor::new("0x00ff00").unwrap().as_ref(), "#0f0");
        assert_eq!(AttachmentColor::new("#abc").unwrap().as_ref(), "#abc");
        assert_eq!(
            AttachmentColor::new("rgb(18, 52, 86)").unwrap().as_ref(),
            "#123456"
        );
    }

    #[test]
    fn test_color_rejects_garbage() {
        for bad in ["", "#12345", "#ggg", "rgb(1, 2)", "rgb(256, 0, 0)", "blurple"] {
            assert_eq!(
                AttachmentColor::new(bad),
                Err(AttachmentError::InvalidColor {
                    value: bad.to_string()
                }),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_url_requires_http_scheme_and_host() {
        assert!(AttachmentUrl::new("https://example.com/icon.png").is_ok());
        assert!(AttachmentUrl::new("http://localhost:8065/a").is_ok());
        assert!(AttachmentUrl::new("example.com/icon.png").is_err());
        assert!(AttachmentUrl::new("ftp://example.com/icon.png").is_err());
    }

    #[test]
    fn test_serializes_only_set_fields() {
        let attachment = Attachment::new()
            .text("All checks passed")
            .color(AttachmentColor::new("#00FF00").unwrap())
            .title("Build #42")
            .title_link(AttachmentUrl::new("https://ci.example.com/42").unwrap())
            .field(AttachmentField::new("Duration", "3m").short(true))
            .timestamp(AttachmentTimestamp::Epoch(1_700_000_000));

        assert_eq!(
            serde_json::to_value(&attachment).unwrap(),
            json!({
                "color": "#0f0",
                "title": "Build #42",
                "title_link": "https://ci.example.com/42",
                "text": "All checks passed",
                "fields": [{"title": "Duration", "value": "3m", "short": true}],
                "timestamp": 1_700_000_000
            })
        );
    }

    #[test]
    fn test_deserialize_normalizes_and_validates() {
        let attachment: Attachment = serde_json::from_value(json!({
            "color": "RED",
            "author_link": "",
            "image_url": null,
            "timestamp": "yesterday",
            "fields": [{"title": "a", "value": 1}]
        }))
        .unwrap();

        assert_eq!(attachment.color.unwrap().as_ref(), "#f00");
        assert!(attachment.author_link.is_none());
        assert!(attachment.image_url.is_none());
        assert_eq!(
            attachment.timestamp,
            Some(AttachmentTimestamp::Text("yesterday".to_string()))
        );
        assert!(!attachment.fields[0].short);

        let result = serde_json::from_value::<Attachment>(json!({"thumb_url": "not a url"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_prepare_integration_sets_callback_urls() {
        let mut attachment = Attachment::new()
            .action(AttachmentAction::button("approve", "Approve").with_context("ticket", 7))
            .action(
                AttachmentAction::select("assignee", "Assign")
                    .with_property("data_source", "users"),
            );

        attachment
            .prepare_integration("https://bot.example.com/hooks/")
            .unwrap();

        assert_eq!(
            attachment.actions[0].integration.url,
            "https://bot.example.com/hooks/approve"
        );
        assert_eq!(
            attachment.actions[1].integration.url,
            "https://bot.example.com/hooks/assignee"
        );

        let json = serde_json::to_value(&attachment.actions[1]).unwrap();
        assert_eq!(
            json,
            json!({
                "id": "assignee",
                "name": "Assign",
                "type": "select",
                "integration": {"url": "https://bot.example.com/hooks/assignee"},
                "data_source": "users"
            })
        );
    }

    #[test]
    fn test_prepare_integration_rejects_relative_webhook() {
        let mut attachment = Attachment::new().action(AttachmentAction::button("a", "A"));
        assert!(matches!(
            attachment.prepare_integration("/hooks"),
            Err(AttachmentError::InvalidUrl { .. })
        ));
        assert_eq!(attachment.actions[0].integration.url, "");
    }
}
