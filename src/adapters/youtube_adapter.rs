//! YouTube Adapter - YouTube Data API upload implementation
//!
//! Resumable upload in two steps: an init call carrying the video metadata
//! that returns an upload session URL, then a PUT of the video bytes.
//! Video only; inline payloads are decoded locally and remote URLs are
//! fetched server-side, since YouTube does not pull media itself.

use crate::adapters::{
    failure_from_status, failure_from_transient, fetch_media_bytes, hashtag_suffix,
    send_with_retry,
};
use crate::core::config::YoutubePrivacy;
use crate::core::error::PublishError;
use crate::core::request::{MediaSource, MediaType, PlatformTarget, PublishRequest};
use crate::core::retry::RetryManager;
use crate::core::traits::{
    PlatformResult, PublishAdapter, ValidationError, ValidationResult,
};
use crate::security::token_manager::SecureTokenManager;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use secrecy::ExposeSecret;
use serde::Deserialize;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/upload/youtube/v3";

/// Maximum description length
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Maximum title length
pub const MAX_TITLE_LEN: usize = 100;

/// Default video category (People & Blogs)
pub const DEFAULT_CATEGORY_ID: &str = "22";

/// Uploaded video resource
#[derive(Debug, Deserialize)]
struct VideoResource {
    id: String,
}

/// YouTube platform adapter
pub struct YoutubeAdapter {
    http: reqwest::Client,
    tokens: SecureTokenManager,
    retry: RetryManager,
    api_base: String,
    category_id: String,
    privacy: YoutubePrivacy,
}

impl Default for YoutubeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl YoutubeAdapter {
    /// Create a new YouTube adapter with the default API base
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            tokens: SecureTokenManager::new(),
            retry: RetryManager::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            category_id: DEFAULT_CATEGORY_ID.to_string(),
            privacy: YoutubePrivacy::Public,
        }
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the video category id
    pub fn with_category_id(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = category_id.into();
        self
    }

    /// Set the upload visibility
    pub fn with_privacy(mut self, privacy: YoutubePrivacy) -> Self {
        self.privacy = privacy;
        self
    }

    fn init_endpoint(&self) -> String {
        format!(
            "{}/videos?uploadType=resumable&part=snippet,status",
            self.api_base
        )
    }

    /// Video description: caption, hashtags, then the call-to-action URL
    pub fn compose_description(request: &PublishRequest) -> String {
        let mut description =
            format!("{}{}", request.caption, hashtag_suffix(&request.tags));
        if let Some(cta) = &request.cta_url {
            description.push('\n');
            description.push_str(cta);
        }
        description
    }

    fn metadata_body(&self, request: &PublishRequest) -> serde_json::Value {
        serde_json::json!({
            "snippet": {
                "title": request.title.clone().unwrap_or_default(),
                "description": Self::compose_description(request),
                "tags": request.tags,
                "categoryId": self.category_id,
            },
            "status": {
                "privacyStatus": self.privacy.as_str(),
            },
        })
    }

    async fn media_bytes(&self, request: &PublishRequest) -> anyhow::Result<Result<Vec<u8>, PlatformResult>> {
        match &request.media {
            MediaSource::Inline { data, .. } => match BASE64.decode(data) {
                Ok(bytes) => Ok(Ok(bytes)),
                // Undecodable payload is the caller's data, not a fault
                Err(e) => Ok(Err(PlatformResult::failure(
                    self.platform(),
                    format!("base64のデコードに失敗しました: {}", e),
                ))),
            },
            MediaSource::Url { url } => {
                let bytes = fetch_media_bytes(&self.http, &self.retry, url).await?;
                Ok(Ok(bytes))
            }
        }
    }
}

#[async_trait]
impl PublishAdapter for YoutubeAdapter {
    fn platform(&self) -> PlatformTarget {
        PlatformTarget::Youtube
    }

    fn validate(&self, request: &PublishRequest) -> ValidationResult {
        let mut errors = Vec::new();

        if request.media_type != MediaType::Video {
            errors.push(ValidationError::new(
                "mediaType",
                "youtubeは動画のみ対応しています",
            ));
        }

        match &request.title {
            None => errors.push(ValidationError::new(
                "title",
                "youtubeにはタイトルが必要です",
            )),
            Some(title) => {
                let title_len = title.chars().count();
                if title_len == 0 {
                    errors.push(ValidationError::new(
                        "title",
                        "youtubeにはタイトルが必要です",
                    ));
                } else if title_len > MAX_TITLE_LEN {
                    errors.push(ValidationError::new(
                        "title",
                        format!(
                            "タイトルが長すぎます（{}文字、上限{}文字）",
                            title_len, MAX_TITLE_LEN
                        ),
                    ));
                }
            }
        }

        let description_len = Self::compose_description(request).chars().count();
        if description_len > MAX_DESCRIPTION_LEN {
            errors.push(ValidationError::new(
                "caption",
                format!(
                    "説明文が長すぎます（{}文字、上限{}文字）",
                    description_len, MAX_DESCRIPTION_LEN
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

        let bytes = match self.media_bytes(request).await? {
            Ok(bytes) => bytes,
            Err(failure) => return Ok(failure),
        };

        // Step 1: open the resumable upload session
        let init_endpoint = self.init_endpoint();
        let metadata = self.metadata_body(request);
        let init = match send_with_retry(&self.retry, || {
            self.http
                .post(&init_endpoint)
                .bearer_auth(token.expose_secret())
                .json(&metadata)
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

        if !(200..300).contains(&init.status) {
            return Ok(failure_from_status(platform, init.status, &init.body));
        }

        let Some(session_url) = init.location else {
            return Err(anyhow::anyhow!("upload session response missing Location"));
        };

        // Step 2: upload the video bytes to the session URL
        let mime_type = request
            .media
            .mime_type()
            .unwrap_or("video/mp4")
            .to_string();
        let upload = match send_with_retry(&self.retry, || {
            self.http
                .put(&session_url)
                .bearer_auth(token.expose_secret())
                .header(reqwest::header::CONTENT_TYPE, mime_type.clone())
                .body(bytes.clone())
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

        if !(200..300).contains(&upload.status) {
            return Ok(failure_from_status(platform, upload.status, &upload.body));
        }

        let video: VideoResource = serde_json::from_value(upload.body)
            .map_err(|e| anyhow::anyhow!("malformed video resource: {}", e))?;

        let post_url = format!("https://youtu.be/{}", video.id);
        Ok(PlatformResult::success(platform, video.id, Some(post_url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_request(caption: &str, title: Option<&str>) -> PublishRequest {
        PublishRequest {
            media_type: MediaType::Video,
            caption: caption.to_string(),
            title: title.map(str::to_string),
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
        assert_eq!(YoutubeAdapter::new().platform(), PlatformTarget::Youtube);
    }

    #[test]
    fn test_init_endpoint() {
        let adapter = YoutubeAdapter::new().with_api_base("http://localhost:8080");
        assert_eq!(
            adapter.init_endpoint(),
            "http://localhost:8080/videos?uploadType=resumable&part=snippet,status"
        );
    }

    #[test]
    fn test_title_required() {
        let adapter = YoutubeAdapter::new();

        let missing = adapter.validate(&video_request("behind the scenes", None));
        assert!(!missing.valid);
        assert!(missing.errors.iter().any(|e| e.field == "title"));

        let empty = adapter.validate(&video_request("behind the scenes", Some("")));
        assert!(!empty.valid);

        let ok = adapter.validate(&video_request("behind the scenes", Some("BTS")));
        assert!(ok.valid);
    }

    #[test]
    fn test_image_rejected() {
        let adapter = YoutubeAdapter::new();
        let mut request = video_request("behind the scenes", Some("BTS"));
        request.media_type = MediaType::Image;

        let result = adapter.validate(&request);
        assert!(!result.valid);
    }

    #[test]
    fn test_long_title_rejected() {
        let adapter = YoutubeAdapter::new();
        let request = video_request("behind the scenes", Some(&"t".repeat(MAX_TITLE_LEN + 1)));

        let result = adapter.validate(&request);
        assert!(!result.valid);
    }

    #[test]
    fn test_metadata_body_shape() {
        let adapter = YoutubeAdapter::new()
            .with_category_id("24")
            .with_privacy(YoutubePrivacy::Unlisted);
        let mut request = video_request("behind the scenes", Some("BTS"));
        request.tags = vec!["studio".to_string()];
        request.cta_url = Some("https://example.com".to_string());

        let body = adapter.metadata_body(&request);

        assert_eq!(body["snippet"]["title"], "BTS");
        assert_eq!(
            body["snippet"]["description"],
            "behind the scenes #studio\nhttps://example.com"
        );
        assert_eq!(body["snippet"]["categoryId"], "24");
        assert_eq!(body["status"]["privacyStatus"], "unlisted");
    }

    #[test]
    fn test_video_resource_parsing() {
        let body = serde_json::json!({
            "kind": "youtube#video",
            "id": "dQw4w9WgXcQ",
            "snippet": { "title": "BTS" }
        });

        let parsed: VideoResource = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.id, "dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn test_inline_decode_failure_is_structured() {
        let adapter = YoutubeAdapter::new();
        let mut request = video_request("behind the scenes", Some("BTS"));
        request.media = MediaSource::Inline {
            data: "%%%not-base64%%%".to_string(),
            mime_type: "video/mp4".to_string(),
        };

        let outcome = adapter.media_bytes(&request).await.unwrap();
        let failure = outcome.unwrap_err();
        assert!(!failure.is_success());
        assert!(failure.message.unwrap().contains("base64"));
    }
}
