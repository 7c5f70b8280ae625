//! Platform adapters
//!
//! One module per platform, each implementing [`crate::core::PublishAdapter`]
//! against that platform's wire protocol, plus the shared HTTP plumbing and
//! the loader that resolves a platform enum to a boxed adapter.

pub mod adapter_loader;
pub mod instagram_adapter;
pub mod tiktok_adapter;
pub mod x_adapter;
pub mod youtube_adapter;

pub use adapter_loader::{AdapterLoader, DetectedPlatform};
pub use instagram_adapter::InstagramAdapter;
pub use tiktok_adapter::TiktokAdapter;
pub use x_adapter::XAdapter;
pub use youtube_adapter::YoutubeAdapter;

use crate::core::error::PublishError;
use crate::core::request::PlatformTarget;
use crate::core::retry::RetryManager;
use crate::core::traits::PlatformResult;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TRANSIENT_STATUS_RE: Regex = Regex::new(r"transient status (\d{3})").unwrap();
}

/// Final response of a platform API call after retries
#[derive(Debug)]
pub(crate) struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
    pub location: Option<String>,
}

/// Send a request, retrying transport faults and transient statuses
///
/// Returns the final response for any non-transient status (including 4xx,
/// which the adapter maps to a structured failure). A transient status that
/// survives every attempt, or a transport fault, surfaces as `Err`.
pub(crate) async fn send_with_retry<F>(
    retry: &RetryManager,
    build: F,
) -> anyhow::Result<ApiResponse>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    retry
        .retry(|| async {
            let response = build()
                .send()
                .await
                .map_err(|e| anyhow::anyhow!("error sending request: {}", e))?;

            let status = response.status().as_u16();
            if RetryManager::is_retryable_status(status) {
                return Err(anyhow::anyhow!("transient status {}", status));
            }

            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let body = response
                .json::<serde_json::Value>()
                .await
                .unwrap_or(serde_json::Value::Null);

            Ok(ApiResponse {
                status,
                body,
                location,
            })
        })
        .await
}

/// Status code of an exhausted transient error, if that is what `err` is
pub(crate) fn transient_status(err: &anyhow::Error) -> Option<u16> {
    TRANSIENT_STATUS_RE
        .captures(&err.to_string())
        .and_then(|caps| caps[1].parse().ok())
}

/// Map an exhausted transient status to a structured failure result
///
/// `None` means the error was a transport fault and should propagate for the
/// orchestrator to normalize.
pub(crate) fn failure_from_transient(
    platform: PlatformTarget,
    err: &anyhow::Error,
) -> Option<PlatformResult> {
    match transient_status(err)? {
        429 => Some(PlatformResult::failure(
            platform,
            PublishError::RateLimited { platform }.to_string(),
        )),
        status => Some(PlatformResult::failure(
            platform,
            PublishError::PublishFailed {
                platform,
                message: format!("platform returned {}", status),
            }
            .to_string(),
        )),
    }
}

/// Map a non-2xx final response to a structured failure result
pub(crate) fn failure_from_status(
    platform: PlatformTarget,
    status: u16,
    body: &serde_json::Value,
) -> PlatformResult {
    let error = match status {
        401 => PublishError::AuthenticationFailed { platform },
        403 => PublishError::ContentRejected {
            platform,
            message: extract_error_message(body)
                .unwrap_or_else(|| "forbidden".to_string()),
        },
        429 => PublishError::RateLimited { platform },
        _ => PublishError::PublishFailed {
            platform,
            message: extract_error_message(body)
                .unwrap_or_else(|| format!("platform returned {}", status)),
        },
    };
    PlatformResult::failure(platform, error.to_string())
}

/// Best-effort error message from the common platform response shapes
pub(crate) fn extract_error_message(body: &serde_json::Value) -> Option<String> {
    let candidates = [
        &body["error"]["message"],
        &body["errors"][0]["message"],
        &body["error_description"],
        &body["detail"],
        &body["title"],
        &body["message"],
    ];

    candidates
        .iter()
        .find_map(|v| v.as_str())
        .map(str::to_string)
}

/// Fetch remote media bytes for platforms that upload server-side
pub(crate) async fn fetch_media_bytes(
    http: &reqwest::Client,
    retry: &RetryManager,
    url: &str,
) -> anyhow::Result<Vec<u8>> {
    let bytes = retry
        .retry(|| async {
            let response = http
                .get(url)
                .send()
                .await
                .map_err(|e| anyhow::anyhow!("error sending request: {}", e))?;

            let status = response.status().as_u16();
            if RetryManager::is_retryable_status(status) {
                return Err(anyhow::anyhow!("transient status {}", status));
            }
            if !(200..300).contains(&status) {
                return Err(anyhow::anyhow!(
                    "media fetch failed with status {}",
                    status
                ));
            }

            response
                .bytes()
                .await
                .map_err(|e| anyhow::anyhow!("error reading media body: {}", e))
        })
        .await?;

    Ok(bytes.to_vec())
}

/// Render tags as a hashtag suffix (" #a #b"), empty when there are none
pub(crate) fn hashtag_suffix(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = tags.iter().map(|t| format!("#{}", t)).collect();
    format!(" {}", rendered.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_status_parsing() {
        let err = anyhow::anyhow!("transient status 429");
        assert_eq!(transient_status(&err), Some(429));

        let err = anyhow::anyhow!("error sending request: connection reset");
        assert_eq!(transient_status(&err), None);
    }

    #[test]
    fn test_failure_from_transient_rate_limit() {
        let err = anyhow::anyhow!("transient status 429");
        let result = failure_from_transient(PlatformTarget::X, &err).unwrap();

        assert!(!result.is_success());
        assert!(result.message.as_deref().unwrap().contains("レート制限"));
    }

    #[test]
    fn test_failure_from_transient_server_error() {
        let err = anyhow::anyhow!("transient status 503");
        let result = failure_from_transient(PlatformTarget::Youtube, &err).unwrap();

        assert!(!result.is_success());
        assert!(result.message.as_deref().unwrap().contains("503"));
    }

    #[test]
    fn test_failure_from_transient_transport_fault_passes_through() {
        let err = anyhow::anyhow!("error sending request: dns error");
        assert!(failure_from_transient(PlatformTarget::X, &err).is_none());
    }

    #[test]
    fn test_failure_from_status_auth() {
        let result =
            failure_from_status(PlatformTarget::Instagram, 401, &serde_json::Value::Null);

        assert!(!result.is_success());
        assert!(result.message.as_deref().unwrap().contains("認証"));
    }

    #[test]
    fn test_failure_from_status_policy() {
        let body = serde_json::json!({"error": {"message": "content violates policy"}});
        let result = failure_from_status(PlatformTarget::Tiktok, 403, &body);

        assert!(result.message.as_deref().unwrap().contains("content violates policy"));
    }

    #[test]
    fn test_extract_error_message_shapes() {
        let graph = serde_json::json!({"error": {"message": "Invalid user id"}});
        assert_eq!(
            extract_error_message(&graph).as_deref(),
            Some("Invalid user id")
        );

        let x_style = serde_json::json!({"errors": [{"message": "duplicate content"}]});
        assert_eq!(
            extract_error_message(&x_style).as_deref(),
            Some("duplicate content")
        );

        let detail = serde_json::json!({"detail": "Too Many Requests"});
        assert_eq!(
            extract_error_message(&detail).as_deref(),
            Some("Too Many Requests")
        );

        assert_eq!(extract_error_message(&serde_json::Value::Null), None);
    }

    #[test]
    fn test_hashtag_suffix() {
        assert_eq!(hashtag_suffix(&[]), "");
        assert_eq!(
            hashtag_suffix(&["art".to_string(), "render".to_string()]),
            " #art #render"
        );
    }
}
