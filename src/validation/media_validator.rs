//! Media Validator - Validates media references before dispatch
//!
//! Checks the shape of a media reference (URL scheme, MIME allowlists,
//! base64 payload sanity and size ceiling) without touching the network.

use crate::core::request::{MediaSource, MediaType};
use crate::core::traits::{ValidationError, ValidationResult, ValidationWarning};
use lazy_static::lazy_static;
use regex::Regex;

/// Image MIME types accepted across the supported platforms
pub const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Video MIME types accepted across the supported platforms
pub const VIDEO_MIME_TYPES: &[&str] = &["video/mp4", "video/quicktime", "video/webm"];

/// Maximum decoded size of an inline payload (50 MiB)
pub const MAX_INLINE_BYTES: usize = 50 * 1024 * 1024;

lazy_static! {
    static ref BASE64_RE: Regex = Regex::new(r"^[A-Za-z0-9+/]+={0,2}$").unwrap();
}

/// Validator for media references
pub struct MediaValidator;

impl Default for MediaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a media reference against its declared media type
    ///
    /// # Examples
    ///
    /// ```
    /// use social_publisher::core::{MediaSource, MediaType};
    /// use social_publisher::validation::MediaValidator;
    ///
    /// let validator = MediaValidator::new();
    /// let source = MediaSource::Url { url: "https://cdn.example.com/a.png".to_string() };
    /// assert!(validator.validate(&source, MediaType::Image).valid);
    /// ```
    pub fn validate(&self, media: &MediaSource, media_type: MediaType) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        match media {
            MediaSource::Url { url } => {
                self.check_url(url, &mut errors, &mut warnings);
            }
            MediaSource::Inline { data, mime_type } => {
                self.check_mime(mime_type, media_type, &mut errors);
                self.check_base64(data, &mut errors);
            }
        }

        ValidationResult::from_findings(errors, warnings)
    }

    fn check_url(
        &self,
        url: &str,
        errors: &mut Vec<ValidationError>,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        if let Some(rest) = url.strip_prefix("https://") {
            if rest.is_empty() {
                errors.push(ValidationError::new("mediaUrl", "URLが不完全です"));
            }
        } else if url.starts_with("http://") {
            // Platforms fetch the media themselves; most reject plain http
            warnings.push(ValidationWarning::new(
                "mediaUrl",
                "httpsのURLを推奨します（httpは拒否される場合があります）",
            ));
        } else {
            errors.push(ValidationError::new(
                "mediaUrl",
                "http(s)のURLを指定してください",
            ));
        }
    }

    fn check_mime(
        &self,
        mime_type: &str,
        media_type: MediaType,
        errors: &mut Vec<ValidationError>,
    ) {
        if !Self::is_mime_supported(mime_type, media_type) {
            errors.push(ValidationError::new(
                "mimeType",
                format!(
                    "{}には未対応のMIMEタイプです: {}",
                    media_type, mime_type
                ),
            ));
        }
    }

    fn check_base64(&self, data: &str, errors: &mut Vec<ValidationError>) {
        if data.is_empty() {
            errors.push(ValidationError::new("mediaBase64", "データが空です"));
            return;
        }

        if data.len() % 4 != 0 || !BASE64_RE.is_match(data) {
            errors.push(ValidationError::new(
                "mediaBase64",
                "base64として不正なデータです",
            ));
            return;
        }

        if Self::estimated_decoded_len(data) > MAX_INLINE_BYTES {
            errors.push(ValidationError::new(
                "mediaBase64",
                format!(
                    "インラインメディアが大きすぎます（上限{}MB）",
                    MAX_INLINE_BYTES / (1024 * 1024)
                ),
            ));
        }
    }

    /// Whether a MIME type is acceptable for the given media type
    pub fn is_mime_supported(mime_type: &str, media_type: MediaType) -> bool {
        let allowed = match media_type {
            MediaType::Image => IMAGE_MIME_TYPES,
            MediaType::Video => VIDEO_MIME_TYPES,
        };
        allowed.contains(&mime_type.to_lowercase().as_str())
    }

    /// Decoded byte length of a base64 payload, without decoding it
    pub fn estimated_decoded_len(data: &str) -> usize {
        let padding = data.bytes().rev().take_while(|b| *b == b'=').count();
        (data.len() / 4) * 3 - padding
    }
}
