//! Optional bounded retry with exponential backoff for upstream calls.
//!
//! The default configuration makes a single attempt, so failures propagate
//! immediately unless a caller opts in.

use crate::error::ScanError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts including the first one. `1` disables retry.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

impl RetryConfig {
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            backoff_factor: 2.0,
            jitter: true,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 1
    }

    /// Delay before retry number `attempt` (zero based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponential = self.base_delay.as_secs_f64() * self.backoff_factor.powi(attempt as i32);

        let delay = if self.jitter {
            exponential * (0.5 + fastrand::f64())
        } else {
            exponential
        };

        // `max_delay` bounds the jittered value too
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64())).min(self.max_delay)
    }
}

pub trait RetryableError {
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ScanError {
    fn is_retryable(&self) -> bool {
        match self {
            ScanError::Transport(e) => e.is_timeout() || e.is_connect(),
            ScanError::Upstream { status, .. } => *status == 408 || *status == 429 || *status >= 500,
            ScanError::NotFound
            | ScanError::MalformedResponse(_)
            | ScanError::InvalidUrl(_)
            | ScanError::InvalidPath(_) => false,
        }
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent.
pub async fn retry<F, Fut, T, E>(cfg: &RetryConfig, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;

                if !err.is_retryable() || attempt >= cfg.max_attempts {
                    return Err(err);
                }

                let delay = cfg.delay_for(attempt - 1);
                warn!(
                    error = %err,
                    attempt,
                    max_attempts = cfg.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "retrying upstream request"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
