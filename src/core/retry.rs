//! Retry logic with exponential backoff
//!
//! Bounded retry for transient transport faults inside platform adapters.
//! The orchestrator never retries; a platform call that keeps failing here
//! surfaces as that platform's failure result.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// HTTP status codes worth a second attempt
const RETRYABLE_STATUS: &[u16] = &[429, 500, 502, 503, 504];

/// Options for retry behavior
#[derive(Debug, Clone)]
pub struct RetryOptions {
    /// Maximum number of attempts (first try included)
    pub max_attempts: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

/// Retry manager for executing operations with exponential backoff
///
/// # Examples
///
/// ```no_run
/// use social_publisher::core::{RetryManager, RetryOptions};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let manager = RetryManager::new(RetryOptions::default());
///
///     let body = manager.retry(|| async {
///         // Platform API call here
///         Ok::<_, anyhow::Error>("created")
///     }).await?;
///
///     Ok(())
/// }
/// ```
pub struct RetryManager {
    options: RetryOptions,
}

impl Default for RetryManager {
    fn default() -> Self {
        Self::new(RetryOptions::default())
    }
}

impl RetryManager {
    /// Create a new RetryManager with the given options
    pub fn new(options: RetryOptions) -> Self {
        Self { options }
    }

    /// Execute the given async operation with retry logic
    ///
    /// Only transient transport faults are retried; structured platform
    /// refusals pass through on the first attempt.
    pub async fn retry<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut delay = self.options.initial_delay;
        let mut last_error: Option<E> = None;

        for attempt in 1..=self.options.max_attempts {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    if !Self::is_retryable_error(&error) {
                        return Err(error);
                    }

                    if attempt >= self.options.max_attempts {
                        return Err(error);
                    }

                    last_error = Some(error);

                    sleep(delay).await;

                    delay = Duration::from_secs_f64(
                        delay.as_secs_f64() * self.options.backoff_multiplier,
                    )
                    .min(self.options.max_delay);
                }
            }
        }

        // Unreachable: the loop always returns on the last attempt
        Err(last_error.unwrap())
    }

    /// Check if an HTTP status code indicates a transient condition
    pub fn is_retryable_status(status: u16) -> bool {
        RETRYABLE_STATUS.contains(&status)
    }

    /// Check if an error should be retried
    ///
    /// Connection-level faults, timeouts, and transient HTTP statuses are
    /// retryable; everything else fails fast.
    pub fn is_retryable_error<E: std::fmt::Display>(error: &E) -> bool {
        let error_msg = error.to_string().to_lowercase();

        if RETRYABLE_STATUS
            .iter()
            .any(|s| error_msg.contains(&format!("status {}", s)) || error_msg.contains(&format!("({})", s)))
        {
            return true;
        }

        let retryable_patterns = [
            "timed out",
            "timeout",
            "connection refused",
            "connection reset",
            "connection closed",
            "dns error",
            "network error",
            "temporarily unavailable",
            "error sending request",
        ];

        retryable_patterns
            .iter()
            .any(|pattern| error_msg.contains(pattern))
    }
}
