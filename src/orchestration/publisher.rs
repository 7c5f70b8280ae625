//! Publish Orchestrator - Fans one request out to multiple platforms
//!
//! Validates the request, dispatches one publish attempt per unique target
//! through the adapter abstraction, and aggregates per-platform outcomes.
//! One platform's failure never suppresses another's dispatch or result:
//! structured refusals, transport faults, panics, and timeouts all land in
//! that platform's slot of the result sequence, which is always ordered by
//! the input target order. The orchestrator performs no retries and has no
//! side effects beyond the adapter calls.

use crate::core::config::PublisherConfig;
use crate::core::error::PublishError;
use crate::core::request::{PlatformTarget, PublishRequest, MAX_CAPTION_LEN, MIN_CAPTION_LEN};
use crate::core::traits::{PlatformResult, PublishAdapter};
use crate::validation::request_validator::RequestValidator;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::time::timeout_at;
use uuid::Uuid;

/// Orchestrator tuning options
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Maximum concurrent platform calls
    pub max_concurrency: usize,

    /// Overall deadline for one publish call; platforms still in flight
    /// when it expires are reported as timed-out failures
    pub timeout: Duration,

    /// Dispatch platforms one at a time instead of concurrently
    pub sequential: bool,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            timeout: Duration::from_secs(60),
            sequential: false,
        }
    }
}

impl OrchestratorOptions {
    /// Derive options from the loaded configuration
    pub fn from_config(config: &PublisherConfig) -> Self {
        let defaults = Self::default();
        let Some(publish) = &config.publish else {
            return defaults;
        };

        Self {
            max_concurrency: publish.max_concurrency.unwrap_or(defaults.max_concurrency),
            timeout: publish
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            sequential: publish.sequential.unwrap_or(defaults.sequential),
        }
    }
}

/// Report returned after one publish call, never persisted
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub publish_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// One result per unique target, in input order
    pub results: Vec<PlatformResult>,
    pub succeeded: usize,
    pub failed: usize,
}

impl PublishReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Main publish orchestrator
pub struct PublishOrchestrator {
    adapters: HashMap<PlatformTarget, Arc<dyn PublishAdapter>>,
    validator: RequestValidator,
    options: OrchestratorOptions,
}

impl PublishOrchestrator {
    /// Create an orchestrator over the given adapters
    pub fn new(adapters: HashMap<PlatformTarget, Arc<dyn PublishAdapter>>) -> Self {
        Self {
            adapters,
            validator: RequestValidator::new(),
            options: OrchestratorOptions::default(),
        }
    }

    /// Override the tuning options
    pub fn with_options(mut self, options: OrchestratorOptions) -> Self {
        self.options = options;
        self
    }

    /// Publish one request to every target platform
    ///
    /// Duplicate targets are de-duplicated, first occurrence wins. The call
    /// fails as a whole only on request validation problems; per-platform
    /// outcomes, success or failure, are always a complete set covering
    /// every unique target in input order.
    pub async fn publish(
        &self,
        request: &PublishRequest,
        targets: &[PlatformTarget],
    ) -> Result<PublishReport, PublishError> {
        let started_at = Utc::now();
        let start = Instant::now();

        let targets = Self::dedup_targets(targets);
        if targets.is_empty() {
            return Err(PublishError::NoTargets);
        }

        // Preconditions, checked before any dispatch
        let caption_len = request.caption.chars().count();
        if caption_len < MIN_CAPTION_LEN {
            return Err(PublishError::CaptionTooShort {
                length: caption_len,
            });
        }
        if caption_len > MAX_CAPTION_LEN {
            return Err(PublishError::CaptionTooLong {
                length: caption_len,
            });
        }
        let report = self.validator.validate_request(request);
        if !report.valid {
            return Err(PublishError::RequestInvalid {
                message: report.summary(),
            });
        }

        let deadline = tokio::time::Instant::now() + self.options.timeout;
        let results = if self.options.sequential {
            self.dispatch_sequential(request, &targets, deadline).await
        } else {
            self.dispatch_concurrent(request, &targets, deadline).await
        };

        if results.len() != targets.len() {
            return Err(PublishError::Internal {
                message: format!(
                    "result count mismatch: {} targets, {} results",
                    targets.len(),
                    results.len()
                ),
            });
        }

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let failed = results.len() - succeeded;

        Ok(PublishReport {
            publish_id: Uuid::new_v4(),
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            results,
            succeeded,
            failed,
        })
    }

    /// De-duplicate targets, preserving first-occurrence order
    fn dedup_targets(targets: &[PlatformTarget]) -> Vec<PlatformTarget> {
        let mut seen = HashSet::new();
        targets
            .iter()
            .filter(|platform| seen.insert(**platform))
            .copied()
            .collect()
    }

    /// Dispatch platforms one at a time, in input order
    async fn dispatch_sequential(
        &self,
        request: &PublishRequest,
        targets: &[PlatformTarget],
        deadline: tokio::time::Instant,
    ) -> Vec<PlatformResult> {
        let mut results = Vec::with_capacity(targets.len());
        let mut deadline_hit = false;

        for &platform in targets {
            let Some(adapter) = self.adapters.get(&platform) else {
                results.push(Self::unconfigured(platform));
                continue;
            };

            // Undispatched targets past the deadline are cancelled, not
            // silently omitted
            if deadline_hit {
                results.push(Self::cancelled(platform));
                continue;
            }

            // Each call gets its own copy of the request
            let request = request.clone();
            let result = match timeout_at(deadline, adapter.publish(&request)).await {
                Err(_) => {
                    deadline_hit = true;
                    Self::timed_out(platform)
                }
                Ok(Ok(result)) => result,
                Ok(Err(e)) => Self::fault(platform, &e),
            };
            results.push(result);
        }

        results
    }

    /// Dispatch platforms concurrently, then join in input order
    async fn dispatch_concurrent(
        &self,
        request: &PublishRequest,
        targets: &[PlatformTarget],
        deadline: tokio::time::Instant,
    ) -> Vec<PlatformResult> {
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency));
        let mut handles = Vec::with_capacity(targets.len());

        for &platform in targets {
            let Some(adapter) = self.adapters.get(&platform) else {
                handles.push((platform, None));
                continue;
            };

            let adapter = Arc::clone(adapter);
            let request = request.clone();
            let semaphore = Arc::clone(&semaphore);

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.unwrap();
                adapter.publish(&request).await
            });
            handles.push((platform, Some(handle)));
        }

        // Joining in input order keeps the result sequence ordered by the
        // input target sequence regardless of completion order
        let mut results = Vec::with_capacity(handles.len());
        let mut deadline_hit = false;
        for (platform, handle) in handles {
            let Some(handle) = handle else {
                results.push(Self::unconfigured(platform));
                continue;
            };

            let abort = handle.abort_handle();
            let result = match timeout_at(deadline, handle).await {
                Err(_) => {
                    abort.abort();
                    // First expiry is the timeout; the rest of the in-flight
                    // calls are abandoned as cancelled
                    if deadline_hit {
                        Self::cancelled(platform)
                    } else {
                        deadline_hit = true;
                        Self::timed_out(platform)
                    }
                }
                Ok(Ok(Ok(result))) => result,
                Ok(Ok(Err(e))) => Self::fault(platform, &e),
                Ok(Err(join_error)) => PlatformResult::failure(
                    platform,
                    format!("publish task failed: {}", join_error),
                ),
            };
            results.push(result);
        }

        results
    }

    fn unconfigured(platform: PlatformTarget) -> PlatformResult {
        PlatformResult::failure(
            platform,
            PublishError::AdapterNotConfigured { platform }.to_string(),
        )
    }

    fn timed_out(platform: PlatformTarget) -> PlatformResult {
        PlatformResult::failure(
            platform,
            PublishError::TimeoutError { platform }.to_string(),
        )
    }

    fn cancelled(platform: PlatformTarget) -> PlatformResult {
        PlatformResult::failure(
            platform,
            PublishError::Cancelled { platform }.to_string(),
        )
    }

    fn fault(platform: PlatformTarget, error: &anyhow::Error) -> PlatformResult {
        PlatformResult::failure(platform, format!("{:#}", error))
    }
}
