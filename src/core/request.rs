//! Publish request model
//!
//! This module defines the data carried by one publish call: the media
//! reference, caption metadata, and the target platform set. The media
//! reference is a tagged union so that "both URL and inline payload" or
//! "neither" cannot be represented once a request is constructed.

use crate::core::error::PublishError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum caption length accepted for any platform
pub const MIN_CAPTION_LEN: usize = 3;

/// Maximum caption length accepted before platform-specific limits apply
pub const MAX_CAPTION_LEN: usize = 5000;

/// Kind of media being published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Get string representation of the media type
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformTarget {
    X,
    Instagram,
    Tiktok,
    Youtube,
}

impl PlatformTarget {
    /// Get string representation of the platform
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformTarget::X => "x",
            PlatformTarget::Instagram => "instagram",
            PlatformTarget::Tiktok => "tiktok",
            PlatformTarget::Youtube => "youtube",
        }
    }

    /// Parse a platform identifier (as used in CLI flags and config files)
    pub fn parse(value: &str) -> Result<Self, PublishError> {
        match value.trim().to_lowercase().as_str() {
            "x" | "twitter" => Ok(PlatformTarget::X),
            "instagram" => Ok(PlatformTarget::Instagram),
            "tiktok" => Ok(PlatformTarget::Tiktok),
            "youtube" => Ok(PlatformTarget::Youtube),
            other => Err(PublishError::UnknownPlatform {
                name: other.to_string(),
            }),
        }
    }

    /// All supported platforms
    pub fn all() -> [PlatformTarget; 4] {
        [
            PlatformTarget::X,
            PlatformTarget::Instagram,
            PlatformTarget::Tiktok,
            PlatformTarget::Youtube,
        ]
    }
}

impl fmt::Display for PlatformTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media reference: a remote URL or an inline base64 payload, never both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaSource {
    /// Publicly reachable media URL
    Url { url: String },

    /// Inline base64-encoded media content with its MIME type
    Inline {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

impl MediaSource {
    /// Build a media source from the flat wire fields
    ///
    /// Exactly one of `url` and `data` must be present; an inline payload
    /// additionally requires a MIME type.
    ///
    /// # Examples
    ///
    /// ```
    /// use social_publisher::core::MediaSource;
    ///
    /// let source = MediaSource::from_parts(
    ///     Some("https://cdn.example.com/a.png".to_string()),
    ///     None,
    ///     None,
    /// ).unwrap();
    /// assert!(matches!(source, MediaSource::Url { .. }));
    /// ```
    pub fn from_parts(
        url: Option<String>,
        data: Option<String>,
        mime_type: Option<String>,
    ) -> Result<Self, PublishError> {
        match (url, data) {
            (Some(_), Some(_)) => Err(PublishError::MediaSourceConflict),
            (None, None) => Err(PublishError::MediaSourceMissing),
            (Some(url), None) => Ok(MediaSource::Url { url }),
            (None, Some(data)) => {
                let mime_type = mime_type.ok_or(PublishError::MediaMimeTypeMissing)?;
                Ok(MediaSource::Inline { data, mime_type })
            }
        }
    }

    /// Remote URL, if this source is one
    pub fn url(&self) -> Option<&str> {
        match self {
            MediaSource::Url { url } => Some(url),
            MediaSource::Inline { .. } => None,
        }
    }

    /// MIME type of an inline payload
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            MediaSource::Url { .. } => None,
            MediaSource::Inline { mime_type, .. } => Some(mime_type),
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, MediaSource::Inline { .. })
    }
}

/// A validated publish request
///
/// Construct via [`crate::validation::RequestValidator::build`] from a
/// [`PublishDraft`]; the orchestrator re-checks the cheap invariants before
/// dispatch so hand-built values cannot slip past them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRequest {
    /// Kind of media being published
    #[serde(rename = "mediaType")]
    pub media_type: MediaType,

    /// Caption text (minimum 3 characters)
    pub caption: String,

    /// Optional title (required by YouTube)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Hashtags without the leading `#`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// The media reference
    pub media: MediaSource,

    /// Optional call-to-action URL appended by platforms that support links
    #[serde(skip_serializing_if = "Option::is_none", rename = "ctaUrl")]
    pub cta_url: Option<String>,

    /// Optional campaign identifier for the caller's own correlation
    #[serde(skip_serializing_if = "Option::is_none", rename = "campaignId")]
    pub campaign_id: Option<String>,
}

/// Flat wire shape of a publish request as submitted by callers
///
/// All media fields are optional here; [`crate::validation::RequestValidator`]
/// folds them into a [`MediaSource`] or reports field-level errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishDraft {
    #[serde(rename = "mediaType")]
    pub media_type: Option<MediaType>,

    pub caption: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Remote media URL (mutually exclusive with `mediaBase64`)
    #[serde(skip_serializing_if = "Option::is_none", rename = "mediaUrl")]
    pub media_url: Option<String>,

    /// Inline base64 media content (mutually exclusive with `mediaUrl`)
    #[serde(skip_serializing_if = "Option::is_none", rename = "mediaBase64")]
    pub media_base64: Option<String>,

    /// MIME type of the inline content
    #[serde(skip_serializing_if = "Option::is_none", rename = "mimeType")]
    pub mime_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "ctaUrl")]
    pub cta_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "campaignId")]
    pub campaign_id: Option<String>,
}

/// Asset descriptor as produced by the upstream generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAsset {
    #[serde(rename = "type")]
    pub media_type: MediaType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "mimeType")]
    pub mime_type: Option<String>,
}

impl TryFrom<GeneratedAsset> for MediaSource {
    type Error = PublishError;

    fn try_from(asset: GeneratedAsset) -> Result<Self, Self::Error> {
        MediaSource::from_parts(asset.url, asset.base64, asset.mime_type)
    }
}

impl GeneratedAsset {
    /// Turn a generated asset into a publish draft with the given caption
    pub fn into_draft(self, caption: impl Into<String>) -> PublishDraft {
        PublishDraft {
            media_type: Some(self.media_type),
            caption: Some(caption.into()),
            media_url: self.url,
            media_base64: self.base64,
            mime_type: self.mime_type,
            ..PublishDraft::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse() {
        assert_eq!(PlatformTarget::parse("x").unwrap(), PlatformTarget::X);
        assert_eq!(
            PlatformTarget::parse("  Instagram ").unwrap(),
            PlatformTarget::Instagram
        );
        assert_eq!(
            PlatformTarget::parse("tiktok").unwrap(),
            PlatformTarget::Tiktok
        );
        assert_eq!(
            PlatformTarget::parse("YOUTUBE").unwrap(),
            PlatformTarget::Youtube
        );
    }

    #[test]
    fn test_platform_parse_twitter_alias() {
        assert_eq!(PlatformTarget::parse("twitter").unwrap(), PlatformTarget::X);
    }

    #[test]
    fn test_platform_parse_unknown() {
        let err = PlatformTarget::parse("myspace").unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_PLATFORM");
    }

    #[test]
    fn test_platform_serialization() {
        let json = serde_json::to_string(&PlatformTarget::Tiktok).unwrap();
        assert_eq!(json, r#""tiktok""#);

        let parsed: PlatformTarget = serde_json::from_str(r#""youtube""#).unwrap();
        assert_eq!(parsed, PlatformTarget::Youtube);
    }

    #[test]
    fn test_media_source_url() {
        let source = MediaSource::from_parts(
            Some("https://cdn.example.com/video.mp4".to_string()),
            None,
            None,
        )
        .unwrap();

        assert_eq!(source.url(), Some("https://cdn.example.com/video.mp4"));
        assert!(!source.is_inline());
    }

    #[test]
    fn test_media_source_inline() {
        let source = MediaSource::from_parts(
            None,
            Some("aGVsbG8=".to_string()),
            Some("image/png".to_string()),
        )
        .unwrap();

        assert!(source.is_inline());
        assert_eq!(source.mime_type(), Some("image/png"));
    }

    #[test]
    fn test_media_source_both_rejected() {
        let err = MediaSource::from_parts(
            Some("https://cdn.example.com/a.png".to_string()),
            Some("aGVsbG8=".to_string()),
            Some("image/png".to_string()),
        )
        .unwrap_err();

        assert_eq!(err.code(), "MEDIA_SOURCE_CONFLICT");
    }

    #[test]
    fn test_media_source_neither_rejected() {
        let err = MediaSource::from_parts(None, None, None).unwrap_err();
        assert_eq!(err.code(), "MEDIA_SOURCE_MISSING");
    }

    #[test]
    fn test_media_source_inline_requires_mime() {
        let err =
            MediaSource::from_parts(None, Some("aGVsbG8=".to_string()), None).unwrap_err();
        assert_eq!(err.code(), "MEDIA_MIME_TYPE_MISSING");
    }

    #[test]
    fn test_generated_asset_conversion() {
        let asset = GeneratedAsset {
            media_type: MediaType::Image,
            url: Some("https://cdn.example.com/gen.png".to_string()),
            base64: None,
            mime_type: None,
        };

        let source = MediaSource::try_from(asset).unwrap();
        assert_eq!(source.url(), Some("https://cdn.example.com/gen.png"));
    }

    #[test]
    fn test_generated_asset_conversion_rejects_ambiguous() {
        let asset = GeneratedAsset {
            media_type: MediaType::Video,
            url: Some("https://cdn.example.com/gen.mp4".to_string()),
            base64: Some("aGVsbG8=".to_string()),
            mime_type: Some("video/mp4".to_string()),
        };

        assert!(MediaSource::try_from(asset).is_err());
    }

    #[test]
    fn test_generated_asset_into_draft() {
        let asset = GeneratedAsset {
            media_type: MediaType::Image,
            url: None,
            base64: Some("aGVsbG8=".to_string()),
            mime_type: Some("image/png".to_string()),
        };

        let draft = asset.into_draft("A fresh render");
        assert_eq!(draft.caption.as_deref(), Some("A fresh render"));
        assert_eq!(draft.media_base64.as_deref(), Some("aGVsbG8="));
        assert!(draft.media_url.is_none());
    }

    #[test]
    fn test_media_source_serialization() {
        let source = MediaSource::Inline {
            data: "aGVsbG8=".to_string(),
            mime_type: "image/png".to_string(),
        };

        let json = serde_json::to_string(&source).unwrap();
        assert!(json.contains(r#""kind":"inline""#));
        assert!(json.contains(r#""mimeType":"image/png""#));

        let parsed: MediaSource = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, source);
    }

    #[test]
    fn test_publish_request_serialization() {
        let request = PublishRequest {
            media_type: MediaType::Video,
            caption: "Launch day".to_string(),
            title: Some("Launch".to_string()),
            tags: vec!["launch".to_string()],
            media: MediaSource::Url {
                url: "https://cdn.example.com/launch.mp4".to_string(),
            },
            cta_url: None,
            campaign_id: Some("spring-2026".to_string()),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""mediaType":"video""#));
        assert!(json.contains(r#""campaignId":"spring-2026""#));
        assert!(!json.contains("ctaUrl"));
    }

    #[test]
    fn test_draft_deserialization_camel_case() {
        let json = r#"{
            "mediaType": "image",
            "caption": "hello",
            "mediaUrl": "https://cdn.example.com/a.png",
            "tags": ["art"]
        }"#;

        let draft: PublishDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.media_type, Some(MediaType::Image));
        assert_eq!(draft.media_url.as_deref(), Some("https://cdn.example.com/a.png"));
        assert_eq!(draft.tags, vec!["art".to_string()]);
    }
}
