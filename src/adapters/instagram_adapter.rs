//! Instagram Adapter - Instagram Graph API publishing implementation
//!
//! Two-phase publish against the Graph API: create a media container for
//! the business account, then publish the container. The platform fetches
//! the media itself, so only remote URLs are supported; inline payloads are
//! reported as a structured failure.

use crate::adapters::{failure_from_status, failure_from_transient, hashtag_suffix, send_with_retry};
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
pub const DEFAULT_API_BASE: &str = "https://graph.facebook.com/v21.0";

/// Maximum caption length, hashtags included
pub const MAX_CAPTION_LEN: usize = 2200;

/// Container creation / publish response
#[derive(Debug, Deserialize)]
struct GraphIdResponse {
    id: String,
}

/// Instagram platform adapter
pub struct InstagramAdapter {
    http: reqwest::Client,
    tokens: SecureTokenManager,
    retry: RetryManager,
    api_base: String,
    user_id: Option<String>,
}

impl Default for InstagramAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl InstagramAdapter {
    /// Create a new Instagram adapter with the default API base
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            tokens: SecureTokenManager::new(),
            retry: RetryManager::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            user_id: None,
        }
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the Instagram business account id
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    fn container_endpoint(&self, user_id: &str) -> String {
        format!("{}/{}/media", self.api_base, user_id)
    }

    fn publish_endpoint(&self, user_id: &str) -> String {
        format!("{}/{}/media_publish", self.api_base, user_id)
    }

    /// Caption with trailing hashtags; the call-to-action URL is appended
    /// even though Instagram renders it as plain text
    pub fn compose_caption(request: &PublishRequest) -> String {
        let mut caption = format!("{}{}", request.caption, hashtag_suffix(&request.tags));
        if let Some(cta) = &request.cta_url {
            caption.push('\n');
            caption.push_str(cta);
        }
        caption
    }

    /// Container payload for the given request
    fn container_params(request: &PublishRequest, url: &str) -> Vec<(&'static str, String)> {
        let caption = Self::compose_caption(request);
        match request.media_type {
            MediaType::Image => vec![
                ("image_url", url.to_string()),
                ("caption", caption),
            ],
            MediaType::Video => vec![
                ("media_type", "REELS".to_string()),
                ("video_url", url.to_string()),
                ("caption", caption),
            ],
        }
    }
}

#[async_trait]
impl PublishAdapter for InstagramAdapter {
    fn platform(&self) -> PlatformTarget {
        PlatformTarget::Instagram
    }

    fn validate(&self, request: &PublishRequest) -> ValidationResult {
        let mut errors = Vec::new();

        if request.media.is_inline() {
            errors.push(ValidationError::new(
                "media",
                "instagramは公開URLのメディアのみ対応しています",
            ));
        }

        let caption_len = Self::compose_caption(request).chars().count();
        if caption_len > MAX_CAPTION_LEN {
            errors.push(ValidationError::new(
                "caption",
                format!(
                    "キャプションが長すぎます（{}文字、上限{}文字）",
                    caption_len, MAX_CAPTION_LEN
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

        let Some(user_id) = self.user_id.clone() else {
            return Ok(PlatformResult::failure(
                platform,
                "instagramのuserIdが設定されていません（.social-publisher.ymlのplatforms.instagram.userId）",
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

        // Phase 1: create the media container
        let container_endpoint = self.container_endpoint(&user_id);
        let params = Self::container_params(request, url);
        let container = match send_with_retry(&self.retry, || {
            self.http
                .post(&container_endpoint)
                .bearer_auth(token.expose_secret())
                .form(&params)
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

        if !(200..300).contains(&container.status) {
            return Ok(failure_from_status(platform, container.status, &container.body));
        }

        let created: GraphIdResponse = serde_json::from_value(container.body)
            .map_err(|e| anyhow::anyhow!("malformed container response: {}", e))?;

        // Phase 2: publish the container
        let publish_endpoint = self.publish_endpoint(&user_id);
        let creation_id = created.id;
        let published = match send_with_retry(&self.retry, || {
            self.http
                .post(&publish_endpoint)
                .bearer_auth(token.expose_secret())
                .form(&[("creation_id", creation_id.as_str())])
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

        if !(200..300).contains(&published.status) {
            return Ok(failure_from_status(platform, published.status, &published.body));
        }

        let post: GraphIdResponse = serde_json::from_value(published.body)
            .map_err(|e| anyhow::anyhow!("malformed publish response: {}", e))?;

        Ok(PlatformResult::success(platform, post.id, None))
    }
}
