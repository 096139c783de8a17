//! Rate-limit governor.
//!
//! Checks the shared quota before every delegated call and blocks until the
//! window resets when it is nearly spent.

use tracing::{debug, info, warn};

use super::{Clock, RateLimits, Repositories, ScopeStore, SystemClock};
use crate::core::constants::RATE_LIMIT_HEADROOM;
use crate::core::domain::{EncryptedPayload, Page, PublicKey, Quota, Repository, ScopeRef, Upsert};
use crate::error::RemoteResult;

/// Quota-aware wrapper around a remote.
#[derive(Debug, Clone)]
pub struct Governed<R, C = SystemClock> {
    inner: R,
    clock: C,
    headroom: f64,
}

impl<R: RateLimits> Governed<R, SystemClock> {
    pub fn new(inner: R) -> Self {
        Self::with_clock(inner, SystemClock)
    }
}

impl<R: RateLimits, C: Clock> Governed<R, C> {
    pub fn with_clock(inner: R, clock: C) -> Self {
        Self {
            inner,
            clock,
            headroom: RATE_LIMIT_HEADROOM,
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Block while the quota is at or under the headroom.
    ///
    /// A failed quota fetch is logged and the call proceeds.
    fn ensure_quota(&self) {
        loop {
            match self.inner.quota() {
                Ok(quota) if quota.is_low(self.headroom) => {
                    let wait = quota.wait(self.clock.now());
                    info!(
                        remaining = quota.remaining,
                        limit = quota.limit,
                        wait_secs = wait.as_secs(),
                        "rate limit nearly exhausted, waiting for reset"
                    );
                    self.clock.sleep(wait);
                }
                Ok(quota) => {
                    debug!(remaining = quota.remaining, limit = quota.limit, "quota ok");
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "failed to check rate limit, proceeding");
                    return;
                }
            }
        }
    }
}

impl<R: ScopeStore + RateLimits, C: Clock> ScopeStore for Governed<R, C> {
    fn list_entries(&self, target: &ScopeRef, page: u32) -> RemoteResult<Page<String>> {
        self.ensure_quota();
        self.inner.list_entries(target, page)
    }

    fn public_key(&self, target: &ScopeRef) -> RemoteResult<PublicKey> {
        self.ensure_quota();
        self.inner.public_key(target)
    }

    fn put_secret(&self, target: &ScopeRef, payload: &EncryptedPayload) -> RemoteResult<Upsert> {
        self.ensure_quota();
        self.inner.put_secret(target, payload)
    }

    fn update_variable(&self, target: &ScopeRef, name: &str, value: &str) -> RemoteResult<()> {
        self.ensure_quota();
        self.inner.update_variable(target, name, value)
    }

    fn create_variable(&self, target: &ScopeRef, name: &str, value: &str) -> RemoteResult<()> {
        self.ensure_quota();
        self.inner.create_variable(target, name, value)
    }

    fn delete_entry(&self, target: &ScopeRef, name: &str) -> RemoteResult<()> {
        self.ensure_quota();
        self.inner.delete_entry(target, name)
    }
}

impl<R: Repositories + RateLimits, C: Clock> Repositories for Governed<R, C> {
    fn repository_id(&self, repository: &Repository) -> RemoteResult<u64> {
        self.ensure_quota();
        self.inner.repository_id(repository)
    }

    fn search_page(&self, query: &str, page: u32) -> RemoteResult<Page<Repository>> {
        self.ensure_quota();
        self.inner.search_page(query, page)
    }
}

impl<R: RateLimits, C: Clock> RateLimits for Governed<R, C> {
    fn quota(&self) -> RemoteResult<Quota> {
        self.inner.quota()
    }
}
