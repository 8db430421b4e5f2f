//! Bounded exponential-backoff retry for async operations.
//!
//! Every error is treated as retryable. Delays grow as
//! `min_timeout * factor^attempt` and are capped at `max_timeout`, without
//! jitter.

use std::{fmt::Display, future::Future, time::Duration};

use tokio::time::sleep;

use crate::warning;

/// Retry configuration for [`retry`].
///
/// The default allows 3 retries (4 invocations in total) with delays of 1s,
/// 2s and 4s, never waiting longer than 60s between two attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of retries after the first failed invocation.
    pub retries: u32,
    /// Multiplier applied to the delay after every retry.
    pub factor: u32,
    /// Delay before the first retry.
    pub min_timeout: Duration,
    /// Upper bound for any single delay.
    pub max_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            factor: 2,
            min_timeout: Duration::from_millis(1000),
            max_timeout: Duration::from_millis(60_000),
        }
    }
}

impl RetryPolicy {
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Returns the delay to wait before retry number `attempt` (zero based).
    ///
    /// # Example
    ///
    /// ```
    /// let policy = RetryPolicy::default();
    /// assert_eq!(policy.delay_for(0), Duration::from_secs(1));
    /// assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    /// ```
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.min_timeout
            .saturating_mul(self.factor.saturating_pow(attempt))
            .min(self.max_timeout)
    }
}

/// Invokes `operation` until it succeeds or the policy's retries are exhausted.
///
/// Returns the first successful result. Once all retries failed the error of
/// the last invocation is returned unchanged, so an always-failing operation
/// is invoked exactly `policy.retries + 1` times. `label` names the operation
/// in the retry log lines.
///
/// # Example
///
/// ```
/// let page = retry(&policy, "playlist tracks", || {
///     spotify.playlist_tracks_page(&token, "p1", Some(0), Some(100))
/// })
/// .await?;
/// ```
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.retries => {
                let delay = policy.delay_for(attempt);
                attempt += 1;
                warning!(
                    "Retrying {} ({}/{}) in {:?}. Err: {}",
                    label,
                    attempt,
                    policy.retries,
                    delay,
                    e
                );
                sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
