//! X Adapter - X (Twitter) publishing implementation
//!
//! Two-step publish: upload the media to the v1.1 media endpoint, then
//! create the post via the v2 endpoint with the returned media id.
//! Inline payloads upload directly; remote URLs are fetched server-side
//! first because X does not pull media itself.

use crate::adapters::{
    failure_from_status, failure_from_transient, fetch_media_bytes, hashtag_suffix,
    send_with_retry,
};
use crate::core::error::PublishError;
use crate::core::request::{MediaSource, PlatformTarget, PublishRequest};
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
pub const DEFAULT_API_BASE: &str = "https://api.x.com";

/// Maximum length of a post, caption and trailing hashtags included
pub const MAX_POST_LEN: usize = 280;

/// Media upload response
#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

/// Post creation response
#[derive(Debug, Deserialize)]
struct CreatePostResponse {
    data: CreatePostData,
}

#[derive(Debug, Deserialize)]
struct CreatePostData {
    id: String,
}

/// X platform adapter
pub struct XAdapter {
    http: reqwest::Client,
    tokens: SecureTokenManager,
    retry: RetryManager,
    api_base: String,
}

impl Default for XAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl XAdapter {
    /// Create a new X adapter with the default API base
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            tokens: SecureTokenManager::new(),
            retry: RetryManager::default(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn upload_endpoint(&self) -> String {
        format!("{}/1.1/media/upload.json", self.api_base)
    }

    fn post_endpoint(&self) -> String {
        format!("{}/2/tweets", self.api_base)
    }

    /// Final post text: caption, hashtags, then the call-to-action URL
    pub fn compose_text(request: &PublishRequest) -> String {
        let mut text = format!("{}{}", request.caption, hashtag_suffix(&request.tags));
        if let Some(cta) = &request.cta_url {
            text.push('\n');
            text.push_str(cta);
        }
        text
    }

    async fn media_payload(&self, request: &PublishRequest) -> anyhow::Result<String> {
        match &request.media {
            MediaSource::Inline { data, .. } => Ok(data.clone()),
            MediaSource::Url { url } => {
                let bytes = fetch_media_bytes(&self.http, &self.retry, url).await?;
                Ok(BASE64.encode(bytes))
            }
        }
    }
}

#[async_trait]
impl PublishAdapter for XAdapter {
    fn platform(&self) -> PlatformTarget {
        PlatformTarget::X
    }

    fn validate(&self, request: &PublishRequest) -> ValidationResult {
        let mut errors = Vec::new();

        let text_len = Self::compose_text(request).chars().count();
        if text_len > MAX_POST_LEN {
            errors.push(ValidationError::new(
                "caption",
                format!(
                    "投稿本文が長すぎます（{}文字、上限{}文字）",
                    text_len, MAX_POST_LEN
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

        // Step 1: media upload
        let media_data = self.media_payload(request).await?;
        let upload_endpoint = self.upload_endpoint();
        let upload = match send_with_retry(&self.retry, || {
            self.http
                .post(&upload_endpoint)
                .bearer_auth(token.expose_secret())
                .form(&[("media_data", media_data.as_str())])
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

        let media: MediaUploadResponse = serde_json::from_value(upload.body)
            .map_err(|e| anyhow::anyhow!("malformed media upload response: {}", e))?;

        // Step 2: post creation
        let body = serde_json::json!({
            "text": Self::compose_text(request),
            "media": { "media_ids": [media.media_id_string] },
        });

        let post_endpoint = self.post_endpoint();
        let created = match send_with_retry(&self.retry, || {
            self.http
                .post(&post_endpoint)
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

        if !(200..300).contains(&created.status) {
            return Ok(failure_from_status(platform, created.status, &created.body));
        }

        let post: CreatePostResponse = serde_json::from_value(created.body)
            .map_err(|e| anyhow::anyhow!("malformed post creation response: {}", e))?;

        let post_url = format!("https://x.com/i/status/{}", post.data.id);
        Ok(PlatformResult::success(platform, post.data.id, Some(post_url)))
    }
}
