//! Retry with exponential backoff.
//!
//! Shared by order creation and order finalization. The caller decides which
//! errors are worth another attempt through a classifier closure.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Hard upper bound on attempts for any network operation.
pub const MAX_ATTEMPTS: u32 = 3;

/// Hard upper bound on a single backoff delay.
pub const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: Duration::from_millis(500),
            max_delay: MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Build a policy, clamping values into the supported range
    /// (1..=3 attempts, delays no longer than 5 seconds).
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        let max_delay = max_delay.min(MAX_BACKOFF);
        Self {
            max_attempts: max_attempts.clamp(1, MAX_ATTEMPTS),
            base_delay: base_delay.min(max_delay),
            max_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after the `attempt`-th failure (1-based).
    ///
    /// `base * 2^(attempt - 1)`, capped at the policy's maximum delay.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    /// Every delay a fully failing operation would wait, in order.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (1..self.max_attempts).map(|attempt| self.delay_after(attempt))
    }
}

/// The last error of a failed operation and how many attempts were made.
#[derive(Debug)]
pub struct RetryFailure<E> {
    pub error: E,
    pub attempts: u32,
}

impl<E: Display> Display for RetryFailure<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (after {} attempt(s))", self.error, self.attempts)
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryFailure<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Run `operation` until it succeeds, fails with an error `is_transient`
/// rejects, or the policy's attempts are used up.
///
/// Attempts are strictly sequential. `operation` receives the 1-based
/// attempt number.
pub async fn retry_with_backoff<F, Fut, T, E, C>(
    policy: &RetryPolicy,
    context: &str,
    is_transient: C,
    mut operation: F,
) -> Result<T, RetryFailure<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> bool,
    E: Display,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(context = %context, attempt = attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if !is_transient(&e) => {
                warn!(context = %context, attempt = attempt, error = %e, "Operation failed, not retryable");
                return Err(RetryFailure { error: e, attempts: attempt });
            }
            Err(e) if attempt >= policy.max_attempts => {
                warn!(context = %context, attempts = attempt, error = %e, "Operation failed after max retries");
                return Err(RetryFailure { error: e, attempts: attempt });
            }
            Err(e) => {
                let backoff = policy.delay_after(attempt);
                warn!(
                    context = %context,
                    attempt = attempt,
                    max_attempts = policy.max_attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "Operation failed, retrying with backoff"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}
