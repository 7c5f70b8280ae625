//! TikTok Adapter - TikTok content posting implementation
//!
//! Single init call against the content posting API with the video pulled
//! from a public URL. Video only; images and inline payloads are reported
//! as structured failures.

use crate::adapters::{failure_from_status, failure_from_transient, hashtag_suffix, send_with_retry};
use crate::core::config::TiktokPrivacy;
use crate::core::error::PublishError;
use crate::core::request::{MediaType, PlatformTarget, PublishRequest};
use crate::core::retry::RetryManager;
use crate::core::traits::{
    PlatformResult, PublishAdapter, ValidationError, ValidationResult,
};
use crate::security::token_manager::SecureTokenManager;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "https://open.tiktokapis.com";

/// Maximum title length, hashtags included
pub const MAX_TITLE_LEN: usize = 2200;

/// Init response envelope
#[derive(Debug, Deserialize)]
struct InitResponse {
    data: Option<InitData>,
    error: InitError,
}

#[derive(Debug, Deserialize)]
struct InitData {
    publish_id: String,
}

#[derive(Debug, Deserialize)]
struct InitError {
    code: String,
    message: String,
}

/// TikTok platform adapter
pub struct TiktokAdapter {
    http: reqwest::Client,
    tokens: SecureTokenManager,
    retry: RetryManager,
    api_base: String,
    privacy: TiktokPrivacy,
}

impl Default for TiktokAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl TiktokAdapter {
    /// Create a new TikTok adapter with the default API base
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            tokens: SecureTokenManager::new(),
            retry: RetryManager::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            privacy: TiktokPrivacy::Public,
        }
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the post visibility
    pub fn with_privacy(mut self, privacy: TiktokPrivacy) -> Self {
        self.privacy = privacy;
        self
    }

    fn init_endpoint(&self) -> String {
        format!("{}/v2/post/publish/video/init/", self.api_base)
    }

    /// Post title: caption with trailing hashtags
    pub fn compose_title(request: &PublishRequest) -> String {
        format!("{}{}", request.caption, hashtag_suffix(&request.tags))
    }

    fn init_body(&self, request: &PublishRequest, video_url: &str) -> serde_json::Value {
        serde_json::json!({
            "post_info": {
                "title": Self::compose_title(request),
                "privacy_level": self.privacy.as_wire(),
            },
            "source_info": {
                "source": "PULL_FROM_URL",
                "video_url": video_url,
            },
        })
    }
}

#[async_trait]
impl PublishAdapter for TiktokAdapter {
    fn platform(&self) -> PlatformTarget {
        PlatformTarget::Tiktok
    }

    fn validate(&self, request: &PublishRequest) -> ValidationResult {
        let mut errors = Vec::new();

        if request.media_type != MediaType::Video {
            errors.push(ValidationError::new(
                "mediaType",
                "tiktokは動画のみ対応しています",
            ));
        }

        if request.media.is_inline() {
            errors.push(ValidationError::new(
                "media",
                "tiktokは公開URLのメディアのみ対応しています",
            ));
        }

        let title_len = Self::compose_title(request).chars().count();
        if title_len > MAX_TITLE_LEN {
            errors.push(ValidationError::new(
                "caption",
                format!(
                    "タイトルが長すぎます（{}文字、上限{}文字）",
                    title_len, MAX_TITLE_LEN
                ),
            ));
        }

        ValidationResult::from_findings(errors, Vec::new())
    }

    async fn publish(&self, request: &PublishRequest) -> anyhow::Result<PlatformResult> {
        let platform = self.platform();

        let Some(token) = self.tokens.get_token(platform) else {
            return Ok(PlatformResult::failure(
                platform,
                PublishError::TokenMissing { platform }.to_string(),
            ));
        };

        let report = self.validate(request);
        if !report.valid {
            return Ok(PlatformResult::failure(platform, report.summary()));
        }

        // validate() rejected inline media above
        let Some(url) = request.media.url() else {
            return Err(anyhow::anyhow!("media url missing after validation"));
        };

        let init_endpoint = self.init_endpoint();
        let body = self.init_body(request, url);
        let response = match send_with_retry(&self.retry, || {
            self.http
                .post(&init_endpoint)
                .bearer_auth(token.expose_secret())
                .json(&body)
        })
        .await
        {
            Ok(response) => response,
            Err(e) => {
                return match failure_from_transient(platform, &e) {
                    Some(result) => Ok(result),
                    None => Err(e),
                };
            }
        };

        if !(200..300).contains(&response.status) {
            return Ok(failure_from_status(platform, response.status, &response.body));
        }

        let init: InitResponse = serde_json::from_value(response.body)
            .map_err(|e| anyhow::anyhow!("malformed init response: {}", e))?;

        // TikTok reports refusals inside a 200 envelope
        if init.error.code != "ok" {
            return Ok(PlatformResult::failure(
                platform,
                PublishError::PublishFailed {
                    platform,
                    message: format!("{}: {}", init.error.code, init.error.message),
                }
                .to_string(),
            ));
        }

        let Some(data) = init.data else {
            return Err(anyhow::anyhow!("init response missing data"));
        };

        Ok(PlatformResult::success(platform, data.publish_id, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::MediaSource;

    fn video_request(caption: &str) -> PublishRequest {
        PublishRequest {
            media_type: MediaType::Video,
            caption: caption.to_string(),
            title: None,
            tags: vec![],
            media: MediaSource::Url {
                url: "https://cdn.example.com/clip.mp4".to_string(),
            },
            cta_url: None,
            campaign_id: None,
        }
    }

    #[test]
    fn test_platform() {
        assert_eq!(TiktokAdapter::new().platform(), PlatformTarget::Tiktok);
    }

    #[test]
    fn test_init_endpoint() {
        let adapter = TiktokAdapter::new().with_api_base("http://localhost:8080");
        assert_eq!(
            adapter.init_endpoint(),
            "http://localhost:8080/v2/post/publish/video/init/"
        );
    }

    #[test]
    fn test_image_rejected() {
        let adapter = TiktokAdapter::new();
        let mut request = video_request("dance clip");
        request.media_type = MediaType::Image;

        let result = adapter.validate(&request);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.field == "mediaType"));
    }

    #[test]
    fn test_inline_media_rejected() {
        let adapter = TiktokAdapter::new();
        let mut request = video_request("dance clip");
        request.media = MediaSource::Inline {
            data: "aGVsbG8=".to_string(),
            mime_type: "video/mp4".to_string(),
        };

        let result = adapter.validate(&request);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.field == "media"));
    }

    #[test]
    fn test_init_body_shape() {
        let adapter = TiktokAdapter::new().with_privacy(TiktokPrivacy::Private);
        let mut request = video_request("dance clip");
        request.tags = vec!["fyp".to_string()];

        let body = adapter.init_body(&request, "https://cdn.example.com/clip.mp4");

        assert_eq!(body["post_info"]["title"], "dance clip #fyp");
        assert_eq!(body["post_info"]["privacy_level"], "SELF_ONLY");
        assert_eq!(body["source_info"]["source"], "PULL_FROM_URL");
        assert_eq!(
            body["source_info"]["video_url"],
            "https://cdn.example.com/clip.mp4"
        );
    }

    #[test]
    fn test_init_response_parsing_ok() {
        let body = serde_json::json!({
            "data": { "publish_id": "v_pub_url~v2.123456789" },
            "error": { "code": "ok", "message": "" }
        });

        let parsed: InitResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.error.code, "ok");
        assert_eq!(parsed.data.unwrap().publish_id, "v_pub_url~v2.123456789");
    }

    #[test]
    fn test_init_response_parsing_refusal() {
        let body = serde_json::json!({
            "data": null,
            "error": { "code": "spam_risk_too_many_posts", "message": "daily limit reached" }
        });

        let parsed: InitResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.error.code, "spam_risk_too_many_posts");
        assert!(parsed.data.is_none());
    }
}
