//! Response classification by content type.

/// The JSON media-type token that marks a structured response.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// How a response body is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    /// The body is JSON and is decoded.
    Structured,
    /// The body is handed back as raw bytes.
    Opaque,
}

/// Classifies a response from its `Content-Type` header alone.
///
/// A response is [`ContentKind::Structured`] exactly when the header contains
/// `application/json` (parameters such as `; charset=utf-8` are allowed). The
/// match is case-sensitive and the body is never inspected.
///
/// # Example
///
/// ```rust
/// use botenix_client::clients::{classify, ContentKind};
///
/// assert_eq!(classify("application/json; charset=utf-8"), ContentKind::Structured);
/// assert_eq!(classify("text/plain"), ContentKind::Opaque);
/// assert_eq!(classify(""), ContentKind::Opaque);
/// ```
#[must_use]
pub fn classify(content_type: &str) -> ContentKind {
    if content_type.contains(JSON_MEDIA_TYPE) {
        ContentKind::Structured
    } else {
        ContentKind::Opaque
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_is_structured() {
        assert_eq!(classify("application/json"), ContentKind::Structured);
    }

    #[test]
    fn test_parameterized_json_is_structured() {
        assert_eq!(
            classify("application/json; charset=utf-8"),
            ContentKind::Structured
        );
        assert_eq!(classify("application/json;charset=UTF-8"), ContentKind::Structured);
    }

    #[test]
    fn test_non_json_types_are_opaque() {
        assert_eq!(classify("text/plain"), ContentKind::Opaque);
        assert_eq!(classify("application/octet-stream"), ContentKind::Opaque);
        assert_eq!(classify("image/png"), ContentKind::Opaque);
    }

    #[test]
    fn test_missing_header_is_opaque() {
        assert_eq!(classify(""), ContentKind::Opaque);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert_eq!(classify("Application/JSON"), ContentKind::Opaque);
    }
}
