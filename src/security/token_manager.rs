//! Secure token manager with memory-safe handling and masking capabilities
//!
//! This module provides secure token management for platform authentication,
//! using the `secrecy` crate to prevent accidental token exposure in logs or
//! memory dumps.

use crate::core::request::PlatformTarget;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::env;

/// Supported platforms with their bearer-token environment variable names
pub const PLATFORM_TOKENS: &[(PlatformTarget, &str)] = &[
    (PlatformTarget::X, "X_BEARER_TOKEN"),
    (PlatformTarget::Instagram, "INSTAGRAM_ACCESS_TOKEN"),
    (PlatformTarget::Tiktok, "TIKTOK_ACCESS_TOKEN"),
    (PlatformTarget::Youtube, "YOUTUBE_ACCESS_TOKEN"),
];

/// Secure token manager for platform authentication
///
/// # Examples
///
/// ```
/// use social_publisher::core::PlatformTarget;
/// use social_publisher::security::SecureTokenManager;
/// use secrecy::ExposeSecret;
///
/// let manager = SecureTokenManager::new();
/// if let Some(token) = manager.get_token(PlatformTarget::X) {
///     println!("X token found: {}", manager.mask_token(token.expose_secret()));
/// }
/// ```
#[derive(Default, Clone)]
pub struct SecureTokenManager {
    _private: (),
}

impl SecureTokenManager {
    /// Creates a new SecureTokenManager
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Retrieves a platform token from its environment variable
    ///
    /// Returns `None` if the token is not set or empty.
    pub fn get_token(&self, platform: PlatformTarget) -> Option<SecretString> {
        let token_value = env::var(Self::token_env(platform)).ok()?;
        if token_value.trim().is_empty() {
            return None;
        }
        Some(SecretString::new(token_value.into()))
    }

    /// Checks if a token is set for the specified platform
    pub fn has_token(&self, platform: PlatformTarget) -> bool {
        self.get_token(platform).is_some()
    }

    /// Gets the environment variable name for a platform
    ///
    /// # Examples
    ///
    /// ```
    /// use social_publisher::core::PlatformTarget;
    /// use social_publisher::security::SecureTokenManager;
    ///
    /// assert_eq!(
    ///     SecureTokenManager::token_env(PlatformTarget::Tiktok),
    ///     "TIKTOK_ACCESS_TOKEN"
    /// );
    /// ```
    pub fn token_env(platform: PlatformTarget) -> &'static str {
        PLATFORM_TOKENS
            .iter()
            .find(|(p, _)| *p == platform)
            .map(|(_, name)| *name)
            .expect("every platform has a token entry")
    }

    /// Masks a token for safe logging
    ///
    /// Shows only the first 3 and last 3 characters for identification.
    /// Tokens shorter than 10 characters are fully masked as "****".
    ///
    /// # Examples
    ///
    /// ```
    /// use social_publisher::security::SecureTokenManager;
    ///
    /// let manager = SecureTokenManager::new();
    /// assert_eq!(manager.mask_token("abcdef123456"), "abc...456");
    /// assert_eq!(manager.mask_token("short"), "****");
    /// ```
    pub fn mask_token(&self, token: &str) -> String {
        if token.is_empty() || token.len() < 10 {
            return "****".to_string();
        }

        let prefix = &token[..3];
        let suffix = &token[token.len() - 3..];
        format!("{}...{}", prefix, suffix)
    }

    /// Masks all configured platform tokens in a string
    ///
    /// Scans the input for any token currently present in the environment
    /// and replaces it with its masked form for safe logging.
    pub fn mask_tokens_in_string(&self, text: &str) -> String {
        let mut masked = text.to_string();

        for (platform, _) in PLATFORM_TOKENS {
            if let Some(token) = self.get_token(*platform) {
                let token_str = token.expose_secret();
                let escaped = regex::escape(token_str);
                if let Ok(pattern) = Regex::new(&escaped) {
                    let masked_token = self.mask_token(token_str);
                    masked = pattern
                        .replace_all(&masked, masked_token.as_str())
                        .to_string();
                }
            }
        }

        masked
    }
}
