//! # Bounded Retry With Exponential Backoff
//!
//! Wraps a fallible async operation. After the `k`-th failed attempt the wrapper
//! waits `2^k * base_delay` before trying again (2s, 4s, 8s, ... with the default
//! one-second base). Errors the caller classifies as non-retryable abort
//! immediately.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// The wait after `attempt` (1-based) attempts have failed.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

#[derive(Error, Debug)]
pub enum RetryError<E> {
    #[error("failed after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: E },
    #[error("aborted after {attempts} attempt(s): {error}")]
    Aborted { attempts: u32, error: E },
}

impl<E> RetryError<E> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } | RetryError::Aborted { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn into_inner(self) -> E {
        match self {
            RetryError::Exhausted { last, .. } => last,
            RetryError::Aborted { error, .. } => error,
        }
    }
}

/// Runs `operation` until it succeeds, a non-retryable error occurs, or
/// `policy.max_attempts` attempts have been made.
///
/// The operation receives the 1-based attempt number.
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut operation: F,
    is_retryable: P,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) if !is_retryable(&error) => {
                warn!("Attempt {attempt}/{max_attempts} failed with a non-retryable error: {error}");
                return Err(RetryError::Aborted {
                    attempts: attempt,
                    error,
                });
            }
            Err(error) if attempt >= max_attempts => {
                warn!("Attempt {attempt}/{max_attempts} failed, giving up: {error}");
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: error,
                });
            }
            Err(error) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "Attempt {attempt}/{max_attempts} failed: {error}. Retrying in {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
