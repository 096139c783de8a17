//! Retry decorator.
//!
//! Wraps every remote call in exponential backoff with jitter. Only
//! transient failures are retried; the last error is returned unchanged
//! once the attempt or time budget is spent.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use super::{Clock, RateLimits, Repositories, ScopeStore, SystemClock};
use crate::core::constants::{
    BACKOFF_INITIAL_INTERVAL, BACKOFF_MAX_ELAPSED, BACKOFF_MAX_INTERVAL, BACKOFF_MULTIPLIER,
    BACKOFF_RANDOMIZATION_FACTOR,
};
use crate::core::domain::{EncryptedPayload, Page, PublicKey, Quota, Repository, ScopeRef, Upsert};
use crate::error::RemoteResult;

/// Attempt and time budget for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub multiplier: f64,
    /// Jitter as a fraction of the interval (0.5 = ±50%).
    pub randomization_factor: f64,
    pub max_interval: Duration,
    pub max_elapsed: Duration,
}

impl RetryPolicy {
    /// Policy allowing `max_retries` total attempts.
    ///
    /// `0` and `1` both mean a single attempt.
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_attempts: max_retries.max(1),
            initial_interval: BACKOFF_INITIAL_INTERVAL,
            multiplier: BACKOFF_MULTIPLIER,
            randomization_factor: BACKOFF_RANDOMIZATION_FACTOR,
            max_interval: BACKOFF_MAX_INTERVAL,
            max_elapsed: BACKOFF_MAX_ELAPSED,
        }
    }

    /// Fresh backoff sequence for one call.
    #[must_use]
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial: self.initial_interval,
            current: self.initial_interval,
            multiplier: self.multiplier,
            randomization_factor: self.randomization_factor,
            max_interval: self.max_interval,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Exponential backoff calculator.
///
/// Each delay is the current interval jittered by the randomization
/// factor; the interval then grows by the multiplier up to the cap.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    initial: Duration,
    current: Duration,
    multiplier: f64,
    randomization_factor: f64,
    max_interval: Duration,
}

impl ExponentialBackoff {
    /// Next delay, advancing the sequence.
    pub fn next_backoff(&mut self) -> Duration {
        let delay = jittered(
            self.current,
            self.randomization_factor,
            rand::thread_rng().gen::<f64>(),
        );

        let grown = self.current.as_secs_f64() * self.multiplier;
        self.current = Duration::from_secs_f64(grown.min(self.max_interval.as_secs_f64()));

        delay
    }

    /// Restart from the initial interval.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// Spread `interval` uniformly over `interval * (1 ± factor)`.
///
/// `random` is in `[0, 1)`.
fn jittered(interval: Duration, factor: f64, random: f64) -> Duration {
    let base = interval.as_secs_f64();
    let delta = base * factor;
    Duration::from_secs_f64((base - delta + random * 2.0 * delta).max(0.0))
}

/// Retries transient failures of the wrapped remote.
#[derive(Debug, Clone)]
pub struct Retrying<R, C = SystemClock> {
    inner: R,
    policy: RetryPolicy,
    clock: C,
}

impl<R> Retrying<R, SystemClock> {
    pub fn new(inner: R, policy: RetryPolicy) -> Self {
        Self::with_clock(inner, policy, SystemClock)
    }
}

impl<R, C: Clock> Retrying<R, C> {
    pub fn with_clock(inner: R, policy: RetryPolicy, clock: C) -> Self {
        Self {
            inner,
            policy,
            clock,
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn run<T>(&self, op: &str, mut call: impl FnMut(&R) -> RemoteResult<T>) -> RemoteResult<T> {
        let mut backoff = self.policy.backoff();
        let started = self.clock.now();
        let mut attempt = 1;

        loop {
            let err = match call(&self.inner) {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !err.is_transient() {
                debug!(op, attempt, error = %err, "permanent failure, not retrying");
                return Err(err);
            }
            if attempt >= self.policy.max_attempts {
                warn!(op, attempt, error = %err, "giving up after last attempt");
                return Err(err);
            }

            let delay = backoff.next_backoff();
            let elapsed = (self.clock.now() - started).to_std().unwrap_or_default();
            if elapsed + delay > self.policy.max_elapsed {
                warn!(op, attempt, error = %err, "giving up, retry time budget spent");
                return Err(err);
            }

            warn!(
                op,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "transient failure, retrying"
            );
            self.clock.sleep(delay);
            attempt += 1;
        }
    }
}

impl<R: ScopeStore, C: Clock> ScopeStore for Retrying<R, C> {
    fn list_entries(&self, target: &ScopeRef, page: u32) -> RemoteResult<Page<String>> {
        self.run("list_entries", |r| r.list_entries(target, page))
    }

    fn public_key(&self, target: &ScopeRef) -> RemoteResult<PublicKey> {
        self.run("public_key", |r| r.public_key(target))
    }

    fn put_secret(&self, target: &ScopeRef, payload: &EncryptedPayload) -> RemoteResult<Upsert> {
        self.run("put_secret", |r| r.put_secret(target, payload))
    }

    fn update_variable(&self, target: &ScopeRef, name: &str, value: &str) -> RemoteResult<()> {
        self.run("update_variable", |r| r.update_variable(target, name, value))
    }

    fn create_variable(&self, target: &ScopeRef, name: &str, value: &str) -> RemoteResult<()> {
        self.run("create_variable", |r| r.create_variable(target, name, value))
    }

    fn delete_entry(&self, target: &ScopeRef, name: &str) -> RemoteResult<()> {
        self.run("delete_entry", |r| r.delete_entry(target, name))
    }
}

impl<R: Repositories, C: Clock> Repositories for Retrying<R, C> {
    fn repository_id(&self, repository: &Repository) -> RemoteResult<u64> {
        self.run("repository_id", |r| r.repository_id(repository))
    }

    fn search_page(&self, query: &str, page: u32) -> RemoteResult<Page<Repository>> {
        self.run("search_page", |r| r.search_page(query, page))
    }
}

impl<R: RateLimits, C: Clock> RateLimits for Retrying<R, C> {
    fn quota(&self) -> RemoteResult<Quota> {
        self.run("quota", |r| r.quota())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_one_mean_single_attempt() {
        assert_eq!(RetryPolicy::new(0).max_attempts, 1);
        assert_eq!(RetryPolicy::new(1).max_attempts, 1);
        assert_eq!(RetryPolicy::new(3).max_attempts, 3);
    }

    #[test]
    fn test_jitter_bounds() {
        let interval = Duration::from_millis(1000);
        assert_eq!(jittered(interval, 0.5, 0.0), Duration::from_millis(500));
        assert_eq!(jittered(interval, 0.5, 0.5), Duration::from_millis(1000));
        assert_eq!(jittered(interval, 0.0, 0.9), interval);
    }

    #[test]
    fn test_backoff_grows_without_jitter() {
        let mut policy = RetryPolicy::new(5);
        policy.randomization_factor = 0.0;
        let mut backoff = policy.backoff();

        assert_eq!(backoff.next_backoff(), Duration::from_millis(500));
        assert_eq!(backoff.next_backoff(), Duration::from_millis(750));
        assert_eq!(backoff.next_backoff(), Duration::from_millis(1125));
    }

    #[test]
    fn test_backoff_capped() {
        let mut policy = RetryPolicy::new(5);
        policy.randomization_factor = 0.0;
        policy.max_interval = Duration::from_millis(625);
        let mut backoff = policy.backoff();

        backoff.next_backoff();
        assert_eq!(backoff.next_backoff(), Duration::from_millis(625));
        assert_eq!(backoff.next_backoff(), Duration::from_millis(625));
    }

    #[test]
    fn test_backoff_reset() {
        let mut policy = RetryPolicy::new(5);
        policy.randomization_factor = 0.0;
        let mut backoff = policy.backoff();

        backoff.next_backoff();
        backoff.next_backoff();
        backoff.reset();
        assert_eq!(backoff.next_backoff(), Duration::from_millis(500));
    }

    #[test]
    fn test_jittered_delay_in_range() {
        let mut backoff = RetryPolicy::new(3).backoff();
        for _ in 0..20 {
            backoff.reset();
            let delay = backoff.next_backoff();
            assert!(delay >= Duration::from_millis(250));
            assert!(delay <= Duration::from_millis(750));
        }
    }
}
