//! Error handling for social publishing
//!
//! This module provides comprehensive error types with recovery guidance
//! using the thiserror crate for ergonomic error handling.

use crate::core::request::PlatformTarget;
use thiserror::Error;

/// Main error type for publish operations
#[derive(Error, Debug)]
pub enum PublishError {
    // Request validation errors
    #[error("キャプションが短すぎます（{length}文字、最低3文字必要です）")]
    CaptionTooShort { length: usize },

    #[error("キャプションが長すぎます（{length}文字）")]
    CaptionTooLong { length: usize },

    #[error("メディアのURLとインラインデータが両方指定されています")]
    MediaSourceConflict,

    #[error("メディアのURLまたはインラインデータのどちらかを指定してください")]
    MediaSourceMissing,

    #[error("インラインメディアにはMIMEタイプが必要です")]
    MediaMimeTypeMissing,

    #[error("対象プラットフォームが指定されていません")]
    NoTargets,

    #[error("不明なプラットフォームです: {name}")]
    UnknownPlatform { name: String },

    #[error("リクエストの検証に失敗しました: {message}")]
    RequestInvalid { message: String },

    // Configuration errors
    #[error("設定ファイルが見つかりません")]
    ConfigNotFound,

    #[error("設定ファイルが不正です: {message}")]
    ConfigInvalid { message: String },

    #[error("設定ファイルの読み込みに失敗しました: {message}")]
    ConfigIo { message: String },

    // Credential errors
    #[error("[{platform}] 認証トークンが設定されていません")]
    TokenMissing { platform: PlatformTarget },

    #[error("[{platform}] 認証に失敗しました")]
    AuthenticationFailed { platform: PlatformTarget },

    // Publishing errors
    #[error("[{platform}] 投稿に失敗しました: {message}")]
    PublishFailed {
        platform: PlatformTarget,
        message: String,
    },

    #[error("[{platform}] コンテンツがプラットフォームのポリシーに拒否されました: {message}")]
    ContentRejected {
        platform: PlatformTarget,
        message: String,
    },

    #[error("[{platform}] レート制限に達しました")]
    RateLimited { platform: PlatformTarget },

    #[error("[{platform}] ネットワークエラーが発生しました: {message}")]
    NetworkError {
        platform: PlatformTarget,
        message: String,
    },

    #[error("[{platform}] タイムアウトしました")]
    TimeoutError { platform: PlatformTarget },

    #[error("[{platform}] 処理がキャンセルされました")]
    Cancelled { platform: PlatformTarget },

    #[error("[{platform}] アダプタが設定されていません")]
    AdapterNotConfigured { platform: PlatformTarget },

    // Orchestrator defects
    #[error("内部エラーが発生しました: {message}")]
    Internal { message: String },
}

impl PublishError {
    /// Get the platform associated with this error, if any
    pub fn platform(&self) -> Option<PlatformTarget> {
        match self {
            Self::TokenMissing { platform }
            | Self::AuthenticationFailed { platform }
            | Self::PublishFailed { platform, .. }
            | Self::ContentRejected { platform, .. }
            | Self::RateLimited { platform }
            | Self::NetworkError { platform, .. }
            | Self::TimeoutError { platform }
            | Self::Cancelled { platform }
            | Self::AdapterNotConfigured { platform } => Some(*platform),
            _ => None,
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::UnknownPlatform { .. } | Self::Internal { .. }
        )
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::CaptionTooShort { .. } => {
                vec!["キャプションを3文字以上にしてください"]
            }
            Self::CaptionTooLong { .. } => {
                vec!["キャプションを短くしてください"]
            }
            Self::MediaSourceConflict => vec![
                "mediaUrlとmediaBase64のどちらか一方のみを指定してください",
            ],
            Self::MediaSourceMissing => vec![
                "mediaUrlまたはmediaBase64を指定してください",
            ],
            Self::MediaMimeTypeMissing => {
                vec!["mimeTypeを指定してください（例: image/png, video/mp4）"]
            }
            Self::NoTargets => {
                vec!["少なくとも1つのプラットフォームを指定してください（x, instagram, tiktok, youtube）"]
            }
            Self::UnknownPlatform { .. } => {
                vec!["対応プラットフォームはx, instagram, tiktok, youtubeです"]
            }
            Self::RequestInvalid { .. } => {
                vec!["検証エラーを確認してください", "リクエストの内容を修正してください"]
            }
            Self::ConfigNotFound => {
                vec!["social-publisher initで設定ファイルを作成してください"]
            }
            Self::ConfigInvalid { .. } | Self::ConfigIo { .. } => {
                vec![".social-publisher.ymlの内容を確認してください"]
            }
            Self::TokenMissing { .. } => {
                vec!["環境変数を設定してください（例: X_BEARER_TOKEN, INSTAGRAM_ACCESS_TOKEN）"]
            }
            Self::AuthenticationFailed { .. } => vec![
                "認証情報を確認してください",
                "トークンの有効期限を確認してください",
            ],
            Self::PublishFailed { .. } => vec![
                "エラーメッセージを確認してください",
                "プラットフォームのステータスを確認してください",
            ],
            Self::ContentRejected { .. } => vec![
                "コンテンツポリシーを確認してください",
                "メディアやキャプションの内容を修正してください",
            ],
            Self::RateLimited { .. } => {
                vec!["しばらく待ってから再試行してください"]
            }
            Self::NetworkError { .. } => vec![
                "インターネット接続を確認してください",
                "しばらく待ってから再試行してください",
            ],
            Self::TimeoutError { .. } => vec![
                "ネットワーク環境を確認してください",
                "--timeoutオプションで時間を延長できます",
            ],
            Self::Cancelled { .. } => {
                vec!["再度publishを実行してください"]
            }
            Self::AdapterNotConfigured { .. } => vec![
                "設定ファイルでプラットフォームを有効にしてください",
                "対応するトークンの環境変数を設定してください",
            ],
            Self::Internal { .. } => {
                vec!["バグの可能性があります。issueを報告してください"]
            }
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::CaptionTooShort { .. } => "CAPTION_TOO_SHORT",
            Self::CaptionTooLong { .. } => "CAPTION_TOO_LONG",
            Self::MediaSourceConflict => "MEDIA_SOURCE_CONFLICT",
            Self::MediaSourceMissing => "MEDIA_SOURCE_MISSING",
            Self::MediaMimeTypeMissing => "MEDIA_MIME_TYPE_MISSING",
            Self::NoTargets => "NO_TARGETS",
            Self::UnknownPlatform { .. } => "UNKNOWN_PLATFORM",
            Self::RequestInvalid { .. } => "REQUEST_INVALID",
            Self::ConfigNotFound => "CONFIG_NOT_FOUND",
            Self::ConfigInvalid { .. } => "CONFIG_INVALID",
            Self::ConfigIo { .. } => "CONFIG_IO",
            Self::TokenMissing { .. } => "TOKEN_MISSING",
            Self::AuthenticationFailed { .. } => "AUTHENTICATION_FAILED",
            Self::PublishFailed { .. } => "PUBLISH_FAILED",
            Self::ContentRejected { .. } => "CONTENT_REJECTED",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::NetworkError { .. } => "NETWORK_ERROR",
            Self::TimeoutError { .. } => "TIMEOUT_ERROR",
            Self::Cancelled { .. } => "CANCELLED",
            Self::AdapterNotConfigured { .. } => "ADAPTER_NOT_CONFIGURED",
            Self::Internal { .. } => "INTERNAL",
        }
    }

    /// Whether this error invalidates the whole publish call
    ///
    /// Request and configuration problems abort before any dispatch;
    /// platform-scoped errors are contained in that platform's result.
    pub fn is_request_error(&self) -> bool {
        self.platform().is_none()
    }
}
