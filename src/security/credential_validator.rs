//! Credential Validator - Detects placeholder and dummy tokens
//!
//! Platform tokens that "work" in config but are obviously test values are a
//! common source of confusing publish failures. This module checks:
//! - Common test/dummy patterns
//! - Character entropy (randomness)
//! - Platform-specific token shapes
//!
//! # Example
//!
//! ```
//! use social_publisher::security::CredentialValidator;
//!
//! let validator = CredentialValidator::new();
//!
//! let result = validator.validate_token("EAAGm0PX4ZCpsBA1bZBxK9qJ7ZAZDZD4n2wLxqUve3F");
//! assert!(result.is_likely_real);
//!
//! let result = validator.validate_token("your_token_here_123456789012345");
//! assert!(!result.is_likely_real);
//! ```

use crate::core::request::PlatformTarget;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of credential validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCheck {
    /// Whether the credential is likely real (not a test/dummy value)
    pub is_likely_real: bool,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f64,
    /// Reason for the decision
    pub reason: String,
    /// Entropy score (bits/char)
    pub entropy: f64,
}

/// Validator for credentials and tokens
pub struct CredentialValidator {
    /// Known test/dummy patterns
    test_patterns: HashSet<String>,
}

impl Default for CredentialValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialValidator {
    /// Create a new credential validator
    pub fn new() -> Self {
        let test_patterns = [
            "test", "example", "dummy", "fake", "sample", "placeholder", "your_", "my_",
            "xxx", "yyy", "zzz", "12345", "abcde", "changeme",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        Self { test_patterns }
    }

    /// Validate a token and determine if it's likely real
    pub fn validate_token(&self, token: &str) -> TokenCheck {
        let token_lower = token.to_lowercase();

        for pattern in &self.test_patterns {
            if token_lower.contains(pattern) {
                return TokenCheck {
                    is_likely_real: false,
                    confidence: 0.9,
                    reason: format!("テストパターンを含みます: {}", pattern),
                    entropy: Self::calculate_entropy(token),
                };
            }
        }

        let entropy = Self::calculate_entropy(token);

        // Real tokens typically have > 3.5 bits/char entropy
        let is_likely_real = entropy > 3.5;
        let confidence = if is_likely_real {
            ((entropy - 3.5) / 1.5).min(1.0)
        } else {
            1.0 - ((3.5 - entropy) / 3.5).min(1.0)
        };

        TokenCheck {
            is_likely_real,
            confidence,
            reason: if is_likely_real {
                format!("エントロピーが高い（{:.2} bits/char）", entropy)
            } else {
                format!("エントロピーが低い（{:.2} bits/char）", entropy)
            },
            entropy,
        }
    }

    /// Validate a token against its platform's expected shape
    ///
    /// Platform APIs issue tokens with recognizable prefixes; a token with
    /// the wrong shape is flagged before any network call is attempted.
    pub fn validate_platform_token(&self, platform: PlatformTarget, token: &str) -> TokenCheck {
        if token.len() < 20 {
            return TokenCheck {
                is_likely_real: false,
                confidence: 0.95,
                reason: "トークンが短すぎます（20文字未満）".to_string(),
                entropy: Self::calculate_entropy(token),
            };
        }

        let expected_prefix = match platform {
            PlatformTarget::X => None,
            PlatformTarget::Instagram => Some("EAA"),
            PlatformTarget::Tiktok => Some("act."),
            PlatformTarget::Youtube => Some("ya29."),
        };

        if let Some(prefix) = expected_prefix {
            if !token.starts_with(prefix) {
                let mut check = self.validate_token(token);
                check.reason = format!(
                    "{}（{}トークンは通常{}で始まります）",
                    check.reason, platform, prefix
                );
                return check;
            }
        }

        self.validate_token(token)
    }

    /// Shannon entropy in bits per character
    fn calculate_entropy(token: &str) -> f64 {
        if token.is_empty() {
            return 0.0;
        }

        let mut counts = std::collections::HashMap::new();
        for c in token.chars() {
            *counts.entry(c).or_insert(0usize) += 1;
        }

        let len = token.chars().count() as f64;
        counts
            .values()
            .map(|&count| {
                let p = count as f64 / len;
                -p * p.log2()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_token_detected() {
        let validator = CredentialValidator::new();

        let result = validator.validate_token("your_token_here_123456789012345");
        assert!(!result.is_likely_real);
        assert!(result.confidence >= 0.9);
        assert!(result.reason.contains("テストパターン"));
    }

    #[test]
    fn test_high_entropy_token_accepted() {
        let validator = CredentialValidator::new();

        let result = validator.validate_token("EAAGm0PX4ZCpsBA1bZBxK9qJ7ZAZDZD4n2wLqUve3F");
        assert!(result.is_likely_real);
        assert!(result.entropy > 3.5);
    }

    #[test]
    fn test_low_entropy_token_rejected() {
        let validator = CredentialValidator::new();

        let result = validator.validate_token("aaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        assert!(!result.is_likely_real);
        assert!(result.entropy < 1.0);
    }

    #[test]
    fn test_platform_token_too_short() {
        let validator = CredentialValidator::new();

        let result = validator.validate_platform_token(PlatformTarget::X, "abc123");
        assert!(!result.is_likely_real);
        assert!(result.reason.contains("短すぎます"));
    }

    #[test]
    fn test_platform_prefix_hint_in_reason() {
        let validator = CredentialValidator::new();

        // High-entropy token without the Meta prefix
        let result = validator.validate_platform_token(
            PlatformTarget::Instagram,
            "Zq8fK2mNpX7vL1wJ4hT6bY9cD3gR5sA0eU",
        );
        assert!(result.reason.contains("EAA"));
    }

    #[test]
    fn test_platform_token_with_expected_prefix() {
        let validator = CredentialValidator::new();

        let result = validator.validate_platform_token(
            PlatformTarget::Youtube,
            "ya29.Zq8fK2mNpX7vL1wJ4hT6bY9cD3gR5sA0eU",
        );
        assert!(result.is_likely_real);
        assert!(!result.reason.contains("通常"));
    }

    #[test]
    fn test_entropy_empty_string() {
        assert_eq!(CredentialValidator::calculate_entropy(""), 0.0);
    }

    #[test]
    fn test_entropy_single_repeated_char() {
        assert_eq!(CredentialValidator::calculate_entropy("aaaa"), 0.0);
    }
}
