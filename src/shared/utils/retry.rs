//! Retry policy and executor for upstream catalog calls
//!
//! Failures are classified through [`AppError::is_transient`]; only transient
//! failures are retried. Backoff sleeps race the caller's cancellation token so
//! a superseded request stops waiting as soon as it is cancelled.

use crate::shared::errors::{AppError, AppResult};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound for any single backoff delay
    pub max_delay: Duration,
    /// Multiplier applied per retry
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(300),
            max_delay: Duration::from_millis(3000),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no backoff
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Delay to wait after the failed attempt with the given zero-based index
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let multiplier = self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis((self.base_delay.as_millis() as f64 * multiplier) as u64);
        delay.min(self.max_delay)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.max_attempts == 0 {
            return Err(AppError::ConfigError(
                "Retry policy needs at least one attempt".to_string(),
            ));
        }
        if self.backoff_multiplier < 1.0 {
            return Err(AppError::ConfigError(format!(
                "Backoff multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            )));
        }
        Ok(())
    }
}

/// Retry executor with exponential backoff
pub struct RetryUtil;

impl RetryUtil {
    /// Execute an operation, retrying transient failures per `policy`
    pub async fn with_retry<F, Fut, T>(
        operation: F,
        policy: &RetryPolicy,
        operation_name: &str,
    ) -> AppResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        Self::with_retry_cancellable(operation, policy, operation_name, &CancellationToken::new())
            .await
    }

    /// Same as [`RetryUtil::with_retry`], but every attempt and every backoff
    /// sleep observes `token`. A cancelled token yields `AppError::Cancelled`.
    pub async fn with_retry_cancellable<F, Fut, T>(
        operation: F,
        policy: &RetryPolicy,
        operation_name: &str,
        token: &CancellationToken,
    ) -> AppResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => Err(cancelled(operation_name)),
                result = operation() => result,
            };

            let error = match result {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(
                            "{} succeeded on attempt {} after {} retries",
                            operation_name,
                            attempt + 1,
                            attempt
                        );
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if error.is_cancelled() {
                return Err(error);
            }

            if !error.is_transient() {
                debug!(
                    "{} failed with non-retryable error: {}",
                    operation_name, error
                );
                return Err(error);
            }

            if attempt + 1 >= max_attempts {
                warn!(
                    "{} failed on final attempt {} ({}), giving up",
                    operation_name,
                    attempt + 1,
                    error
                );
                return Err(error);
            }

            let delay = policy.calculate_delay(attempt);
            warn!(
                "{} failed on attempt {} ({}), retrying in {:?}",
                operation_name,
                attempt + 1,
                error,
                delay
            );

            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(cancelled(operation_name)),
                _ = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    }
}

fn cancelled(operation_name: &str) -> AppError {
    AppError::Cancelled(format!("{} was cancelled", operation_name))
}
