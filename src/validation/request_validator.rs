//! Request Validator - Turns publish drafts into validated requests
//!
//! Field-level validation of the caption metadata plus construction of the
//! media reference from the flat wire fields. The orchestrator also runs
//! [`RequestValidator::validate_request`] on every already-built request so
//! hand-assembled values cannot bypass the invariants.

use crate::core::error::PublishError;
use crate::core::request::{
    MediaSource, PublishDraft, PublishRequest, MAX_CAPTION_LEN, MIN_CAPTION_LEN,
};
use crate::core::traits::{ValidationError, ValidationResult, ValidationWarning};
use crate::validation::media_validator::MediaValidator;
use lazy_static::lazy_static;
use regex::Regex;

/// Maximum number of tags on one request
pub const MAX_TAGS: usize = 30;

/// Maximum length of a single tag
pub const MAX_TAG_LEN: usize = 100;

lazy_static! {
    static ref CAMPAIGN_ID_RE: Regex = Regex::new(r"^[A-Za-z0-9._-]{1,64}$").unwrap();
}

/// Validator for publish requests
pub struct RequestValidator {
    media_validator: MediaValidator,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestValidator {
    pub fn new() -> Self {
        Self {
            media_validator: MediaValidator::new(),
        }
    }

    /// Validate a draft and construct the publish request
    ///
    /// # Examples
    ///
    /// ```
    /// use social_publisher::core::{MediaType, PublishDraft};
    /// use social_publisher::validation::RequestValidator;
    ///
    /// let draft = PublishDraft {
    ///     media_type: Some(MediaType::Image),
    ///     caption: Some("Fresh off the render farm".to_string()),
    ///     media_url: Some("https://cdn.example.com/a.png".to_string()),
    ///     ..PublishDraft::default()
    /// };
    ///
    /// let request = RequestValidator::new().build(draft).unwrap();
    /// assert_eq!(request.caption, "Fresh off the render farm");
    /// ```
    pub fn build(&self, draft: PublishDraft) -> Result<PublishRequest, PublishError> {
        let report = self.validate_draft(&draft);
        if !report.valid {
            return Err(PublishError::RequestInvalid {
                message: report.summary(),
            });
        }

        // Checked by validate_draft above
        let media_type = draft.media_type.ok_or(PublishError::Internal {
            message: "media_type missing after validation".to_string(),
        })?;
        let media =
            MediaSource::from_parts(draft.media_url, draft.media_base64, draft.mime_type)?;

        Ok(PublishRequest {
            media_type,
            caption: draft.caption.unwrap_or_default(),
            title: draft.title,
            tags: draft.tags,
            media,
            cta_url: draft.cta_url,
            campaign_id: draft.campaign_id,
        })
    }

    /// Validate a draft without constructing the request
    pub fn validate_draft(&self, draft: &PublishDraft) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if draft.media_type.is_none() {
            errors.push(ValidationError::new("mediaType", "必須項目です"));
        }

        match &draft.caption {
            None => errors.push(ValidationError::new("caption", "必須項目です")),
            Some(caption) => self.check_caption(caption, &mut errors),
        }

        self.check_tags(&draft.tags, &mut errors, &mut warnings);
        self.check_cta(draft.cta_url.as_deref(), &mut errors);
        self.check_campaign_id(draft.campaign_id.as_deref(), &mut errors);

        match MediaSource::from_parts(
            draft.media_url.clone(),
            draft.media_base64.clone(),
            draft.mime_type.clone(),
        ) {
            Err(e) => {
                let field = match e {
                    PublishError::MediaMimeTypeMissing => "mimeType",
                    _ => "media",
                };
                errors.push(ValidationError::new(field, e.to_string()));
            }
            Ok(media) => {
                if let Some(media_type) = draft.media_type {
                    let media_report = self.media_validator.validate(&media, media_type);
                    errors.extend(media_report.errors);
                    warnings.extend(media_report.warnings);
                }
            }
        }

        ValidationResult::from_findings(errors, warnings)
    }

    /// Re-check the invariants of an already-built request
    ///
    /// Cheap enough to run on every publish call; the media reference shape
    /// is already guaranteed by the `MediaSource` type.
    pub fn validate_request(&self, request: &PublishRequest) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        self.check_caption(&request.caption, &mut errors);
        self.check_tags(&request.tags, &mut errors, &mut warnings);
        self.check_cta(request.cta_url.as_deref(), &mut errors);
        self.check_campaign_id(request.campaign_id.as_deref(), &mut errors);

        let media_report = self
            .media_validator
            .validate(&request.media, request.media_type);
        errors.extend(media_report.errors);
        warnings.extend(media_report.warnings);

        ValidationResult::from_findings(errors, warnings)
    }

    fn check_caption(&self, caption: &str, errors: &mut Vec<ValidationError>) {
        let length = caption.chars().count();
        if length < MIN_CAPTION_LEN {
            errors.push(ValidationError::new(
                "caption",
                format!(
                    "{}文字です（最低{}文字必要です）",
                    length, MIN_CAPTION_LEN
                ),
            ));
        } else if length > MAX_CAPTION_LEN {
            errors.push(ValidationError::new(
                "caption",
                format!("{}文字です（上限{}文字）", length, MAX_CAPTION_LEN),
            ));
        }
    }

    fn check_tags(
        &self,
        tags: &[String],
        errors: &mut Vec<ValidationError>,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        if tags.len() > MAX_TAGS {
            errors.push(ValidationError::new(
                "tags",
                format!("タグが多すぎます（{}個、上限{}個）", tags.len(), MAX_TAGS),
            ));
        }

        for tag in tags {
            if tag.is_empty() || tag.chars().count() > MAX_TAG_LEN {
                errors.push(ValidationError::new(
                    "tags",
                    format!("タグの長さが不正です: {:?}", tag),
                ));
            } else if tag.chars().any(char::is_whitespace) {
                errors.push(ValidationError::new(
                    "tags",
                    format!("タグに空白は使えません: {:?}", tag),
                ));
            } else if tag.starts_with('#') {
                warnings.push(ValidationWarning::new(
                    "tags",
                    format!("先頭の#は不要です: {:?}", tag),
                ));
            }
        }
    }

    fn check_cta(&self, cta_url: Option<&str>, errors: &mut Vec<ValidationError>) {
        if let Some(url) = cta_url {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                errors.push(ValidationError::new(
                    "ctaUrl",
                    "http(s)のURLを指定してください",
                ));
            }
        }
    }

    fn check_campaign_id(&self, campaign_id: Option<&str>, errors: &mut Vec<ValidationError>) {
        if let Some(id) = campaign_id {
            if !CAMPAIGN_ID_RE.is_match(id) {
                errors.push(ValidationError::new(
                    "campaignId",
                    "英数字とハイフン、アンダースコア、ドットのみ64文字以内で指定してください",
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::MediaType;

    fn image_draft(caption: &str) -> PublishDraft {
        PublishDraft {
            media_type: Some(MediaType::Image),
            caption: Some(caption.to_string()),
            media_url: Some("https://cdn.example.com/a.png".to_string()),
            ..PublishDraft::default()
        }
    }

    #[test]
    fn test_build_valid_draft() {
        let request = RequestValidator::new()
            .build(image_draft("Fresh off the render farm"))
            .unwrap();

        assert_eq!(request.media_type, MediaType::Image);
        assert_eq!(request.media.url(), Some("https://cdn.example.com/a.png"));
    }

    #[test]
    fn test_caption_boundary_three_chars_passes() {
        let result = RequestValidator::new().validate_draft(&image_draft("abc"));
        assert!(result.valid);
    }

    #[test]
    fn test_caption_boundary_two_chars_fails() {
        let result = RequestValidator::new().validate_draft(&image_draft("ab"));
        assert!(!result.valid);
        assert_eq!(result.errors[0].field, "caption");
    }

    #[test]
    fn test_caption_missing_fails() {
        let mut draft = image_draft("abc");
        draft.caption = None;

        let result = RequestValidator::new().validate_draft(&draft);
        assert!(!result.valid);
    }

    #[test]
    fn test_caption_multibyte_counted_by_chars() {
        // Three characters even though more than three bytes
        let result = RequestValidator::new().validate_draft(&image_draft("桜写真"));
        assert!(result.valid);
    }

    #[test]
    fn test_both_media_fields_fail() {
        let mut draft = image_draft("abc");
        draft.media_base64 = Some("aGVsbG8=".to_string());
        draft.mime_type = Some("image/png".to_string());

        let result = RequestValidator::new().validate_draft(&draft);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.field == "media"));
    }

    #[test]
    fn test_neither_media_field_fails() {
        let mut draft = image_draft("abc");
        draft.media_url = None;

        let result = RequestValidator::new().validate_draft(&draft);
        assert!(!result.valid);
    }

    #[test]
    fn test_inline_without_mime_fails() {
        let draft = PublishDraft {
            media_type: Some(MediaType::Image),
            caption: Some("abc".to_string()),
            media_base64: Some("aGVsbG8=".to_string()),
            ..PublishDraft::default()
        };

        let result = RequestValidator::new().validate_draft(&draft);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.field == "mimeType"));
    }

    #[test]
    fn test_build_invalid_draft_reports_all_fields() {
        let draft = PublishDraft {
            caption: Some("ab".to_string()),
            ..PublishDraft::default()
        };

        let err = RequestValidator::new().build(draft).unwrap_err();
        assert_eq!(err.code(), "REQUEST_INVALID");
        let message = err.to_string();
        assert!(message.contains("[caption]"));
        assert!(message.contains("[mediaType]"));
    }

    #[test]
    fn test_tag_rules() {
        let mut draft = image_draft("abc");
        draft.tags = vec![
            "generativeart".to_string(),
            "two words".to_string(),
            "#prefixed".to_string(),
        ];

        let result = RequestValidator::new().validate_draft(&draft);
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "tags" && e.message.contains("空白")));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.field == "tags" && w.message.contains("#")));
    }

    #[test]
    fn test_too_many_tags() {
        let mut draft = image_draft("abc");
        draft.tags = (0..31).map(|i| format!("tag{}", i)).collect();

        let result = RequestValidator::new().validate_draft(&draft);
        assert!(!result.valid);
    }

    #[test]
    fn test_cta_url_scheme() {
        let mut draft = image_draft("abc");
        draft.cta_url = Some("javascript:alert(1)".to_string());

        let result = RequestValidator::new().validate_draft(&draft);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.field == "ctaUrl"));
    }

    #[test]
    fn test_campaign_id_slug() {
        let mut draft = image_draft("abc");
        draft.campaign_id = Some("spring 2026!".to_string());

        let result = RequestValidator::new().validate_draft(&draft);
        assert!(!result.valid);

        let mut ok_draft = image_draft("abc");
        ok_draft.campaign_id = Some("spring-2026".to_string());
        assert!(RequestValidator::new().validate_draft(&ok_draft).valid);
    }

    #[test]
    fn test_validate_request_recheck() {
        let request = RequestValidator::new()
            .build(image_draft("Fresh off the render farm"))
            .unwrap();

        let result = RequestValidator::new().validate_request(&request);
        assert!(result.valid);

        // Hand-assembled request with a caption below the minimum
        let mut bad = request.clone();
        bad.caption = "ab".to_string();
        let result = RequestValidator::new().validate_request(&bad);
        assert!(!result.valid);
    }
}
