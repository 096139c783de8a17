//! Remote platform access.
//!
//! Capabilities are split into small traits so decorators can wrap any of
//! them by forwarding:
//!
//! ```text
//! Governed<Retrying<GitHub>>
//!    │         │        └── HTTP calls
//!    │         └── retries transient failures with backoff
//!    └── pauses while the shared quota is nearly spent
//! ```

mod clock;
mod github;
mod governor;
mod paths;
mod retry;

pub use clock::{Clock, SystemClock};
pub use github::GitHub;
pub use governor::Governed;
pub use paths::{collection_path, entry_path, public_key_path};
pub use retry::{ExponentialBackoff, RetryPolicy, Retrying};

use crate::core::domain::{EncryptedPayload, Page, PublicKey, Quota, Repository, ScopeRef, Upsert};
use crate::error::RemoteResult;

/// Per-scope credential store operations.
pub trait ScopeStore {
    /// One page of entry names.
    fn list_entries(&self, target: &ScopeRef, page: u32) -> RemoteResult<Page<String>>;

    /// Sealing key of a secret scope.
    fn public_key(&self, target: &ScopeRef) -> RemoteResult<PublicKey>;

    /// Create or overwrite a sealed secret.
    fn put_secret(&self, target: &ScopeRef, payload: &EncryptedPayload) -> RemoteResult<Upsert>;

    /// Overwrite an existing variable.
    fn update_variable(&self, target: &ScopeRef, name: &str, value: &str) -> RemoteResult<()>;

    /// Create a new variable.
    fn create_variable(&self, target: &ScopeRef, name: &str, value: &str) -> RemoteResult<()>;

    fn delete_entry(&self, target: &ScopeRef, name: &str) -> RemoteResult<()>;

    /// Update a variable, creating it if it does not exist.
    ///
    /// Only a not-found update falls through to create. Any other failure
    /// from either call is returned.
    fn put_variable(&self, target: &ScopeRef, name: &str, value: &str) -> RemoteResult<Upsert> {
        match self.update_variable(target, name, value) {
            Ok(()) => Ok(Upsert::Updated),
            Err(e) if e.is_not_found() => {
                self.create_variable(target, name, value)?;
                Ok(Upsert::Created)
            }
            Err(e) => Err(e),
        }
    }
}

/// Repository lookups.
pub trait Repositories {
    /// Numeric id of a repository.
    fn repository_id(&self, repository: &Repository) -> RemoteResult<u64>;

    /// One page of repository search results.
    fn search_page(&self, query: &str, page: u32) -> RemoteResult<Page<Repository>>;
}

/// Rate-limit quota.
pub trait RateLimits {
    fn quota(&self) -> RemoteResult<Quota>;
}

/// Everything the synchronizer needs.
pub trait Remote: ScopeStore + Repositories + RateLimits {}

impl<T: ScopeStore + Repositories + RateLimits + ?Sized> Remote for T {}
