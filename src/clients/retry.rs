//! Retry policy for the HTTP transport.
//!
//! Transport failures (connection errors, timeouts) and any 5xx response are
//! retried with exponential backoff and jitter. 4xx responses, including 404,
//! are never retried.

use std::time::Duration;

use rand::Rng;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default minimum wait between attempts.
pub const DEFAULT_RETRY_WAIT_MIN: Duration = Duration::from_secs(1);

/// Default maximum wait between attempts.
pub const DEFAULT_RETRY_WAIT_MAX: Duration = Duration::from_secs(30);

/// Bounded exponential backoff with jitter.
///
/// Attempt `n` (zero-based) waits `min(wait_min * 2^n, wait_max)`, of which
/// half is fixed and half is random.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use newrelic_client::clients::RetryPolicy;
///
/// let policy = RetryPolicy::new(5, Duration::from_millis(100), Duration::from_secs(2));
/// assert_eq!(policy.max_retries(), 5);
/// assert!(policy.should_retry_status(503));
/// assert!(!policy.should_retry_status(404));
///
/// let delay = policy.backoff(10, None);
/// assert!(delay <= Duration::from_secs(2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    wait_min: Duration,
    wait_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            wait_min: DEFAULT_RETRY_WAIT_MIN,
            wait_max: DEFAULT_RETRY_WAIT_MAX,
        }
    }
}

impl RetryPolicy {
    /// Creates a retry policy.
    ///
    /// `wait_max` is raised to `wait_min` if it is smaller.
    #[must_use]
    pub fn new(max_retries: u32, wait_min: Duration, wait_max: Duration) -> Self {
        Self {
            max_retries,
            wait_min,
            wait_max: wait_max.max(wait_min),
        }
    }

    /// A policy that sends each request exactly once.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            wait_min: Duration::ZERO,
            wait_max: Duration::ZERO,
        }
    }

    /// Returns the number of retries after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the total number of attempts, first attempt included.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Returns `true` if a response with this status should be retried.
    #[must_use]
    pub const fn should_retry_status(&self, status: u16) -> bool {
        status >= 500
    }

    /// Returns `true` if a transport error should be retried.
    ///
    /// Errors raised while building the request (invalid header values,
    /// unsupported URLs) are permanent and are not retried.
    #[must_use]
    pub fn should_retry_error(&self, error: &reqwest::Error) -> bool {
        !error.is_builder()
    }

    /// Computes the wait before retry number `attempt` (zero-based).
    ///
    /// A server-provided `Retry-After` delay is honored, capped at
    /// `wait_max`.
    #[must_use]
    pub fn backoff(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(retry_after) = retry_after {
            return retry_after.min(self.wait_max);
        }

        let factor = 2u32.saturating_pow(attempt);
        let base = self
            .wait_min
            .checked_mul(factor)
            .unwrap_or(self.wait_max)
            .min(self.wait_max);

        let half = base / 2;
        let spread = u64::try_from(half.as_millis()).unwrap_or(u64::MAX);
        let jitter = if spread == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..=spread))
        };

        half + jitter
    }
}
