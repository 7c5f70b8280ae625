//! Core traits and types for social publishing
//!
//! This module defines the fundamental abstractions for platform adapters,
//! request validation, and per-platform publish outcomes.

use crate::core::request::{PlatformTarget, PublishRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// Validation
// ============================================================================

/// Validation error with field information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    #[serde(default = "default_error_severity")]
    pub severity: String, // Always "error"
}

fn default_error_severity() -> String {
    "error".to_string()
}

/// Validation warning with field information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    #[serde(default = "default_warning_severity")]
    pub severity: String, // Always "warning"
}

fn default_warning_severity() -> String {
    "warning".to_string()
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: "error".to_string(),
        }
    }
}

impl ValidationWarning {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: "warning".to_string(),
        }
    }
}

/// Result of request validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// A passing result with no findings
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Build a result from collected findings
    pub fn from_findings(errors: Vec<ValidationError>, warnings: Vec<ValidationWarning>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Fold the field errors into a single display string
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("[{}] {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ============================================================================
// Publish outcome
// ============================================================================

/// Outcome status of one platform's publish attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Success,
    Failure,
}

/// The outcome record for one platform's publish attempt
///
/// Created once per platform per publish call and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformResult {
    pub platform: PlatformTarget,
    pub status: PublishStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "postId")]
    pub post_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "postUrl")]
    pub post_url: Option<String>,
}

impl PlatformResult {
    /// A successful publish with the platform's post identifier
    pub fn success(
        platform: PlatformTarget,
        post_id: impl Into<String>,
        post_url: Option<String>,
    ) -> Self {
        Self {
            platform,
            status: PublishStatus::Success,
            message: None,
            post_id: Some(post_id.into()),
            post_url,
        }
    }

    /// A contained failure with a human-readable reason
    pub fn failure(platform: PlatformTarget, message: impl Into<String>) -> Self {
        let message = message.into();
        // A failure with no reason is useless to the caller
        let message = if message.trim().is_empty() {
            "unknown error".to_string()
        } else {
            message
        };
        Self {
            platform,
            status: PublishStatus::Failure,
            message: Some(message),
            post_id: None,
            post_url: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PublishStatus::Success
    }
}

// ============================================================================
// Platform Adapter Trait
// ============================================================================

/// Main trait for platform adapter implementations
///
/// One implementation per social platform. An adapter owns everything the
/// orchestrator must not know: credentials, endpoints, payload shapes, and
/// platform content rules.
///
/// Error contract: a *structured* refusal from the platform (bad token,
/// policy rejection, rate limit, unsupported media) is returned as
/// `Ok(PlatformResult::failure(..))`; only unstructured faults (transport
/// errors, malformed responses) surface as `Err`, which the orchestrator
/// normalizes into a failure result.
#[async_trait]
pub trait PublishAdapter: Send + Sync {
    /// The platform this adapter posts to
    fn platform(&self) -> PlatformTarget;

    /// Check a request against this platform's content rules without
    /// performing any network call
    fn validate(&self, request: &PublishRequest) -> ValidationResult;

    /// Perform the publish attempt (exactly one per orchestrator dispatch)
    async fn publish(&self, request: &PublishRequest) -> anyhow::Result<PlatformResult>;
}
