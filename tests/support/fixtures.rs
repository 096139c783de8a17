//! In-memory remote and clock fixtures.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use crypto_box::aead::OsRng;
use crypto_box::SecretKey;

use sync_secrets::core::cipher::{Cipher, SealedBox};
use sync_secrets::core::domain::{
    EncryptedPayload, Page, PublicKey, Quota, Repository, ScopeRef, Upsert,
};
use sync_secrets::core::remote::{Clock, RateLimits, Repositories, ScopeStore};
use sync_secrets::error::{RemoteError, RemoteResult};

pub const KEY_ID: &str = "key-1";

/// A transient server error.
pub fn transient() -> RemoteError {
    RemoteError::status("GET", "/fake", 502, "Bad Gateway")
}

pub fn not_found() -> RemoteError {
    RemoteError::status("GET", "/fake", 404, "Not Found")
}

pub fn forbidden() -> RemoteError {
    RemoteError::status("GET", "/fake", 403, "Resource not accessible by integration")
}

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: &'static str,
    pub name: Option<String>,
}

#[derive(Default)]
struct State {
    /// Stored values per scope label; secrets are kept decrypted.
    entries: HashMap<String, BTreeMap<String, String>>,
    calls: Vec<Call>,
    failures: HashMap<&'static str, VecDeque<RemoteError>>,
    quotas: VecDeque<RemoteResult<Quota>>,
    search: Vec<Repository>,
}

/// Remote that keeps everything in memory and records every call.
pub struct FakeRemote {
    state: RefCell<State>,
    secret: SecretKey,
    page_size: usize,
    repository_id: u64,
}

impl Default for FakeRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRemote {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State::default()),
            secret: SecretKey::generate(&mut OsRng),
            page_size: 100,
            repository_id: 4242,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Pre-populate a scope.
    pub fn seed(&self, target: &ScopeRef, entries: &[(&str, &str)]) {
        let mut state = self.state.borrow_mut();
        let scope = state.entries.entry(target.to_string()).or_default();
        for (name, value) in entries {
            scope.insert(name.to_string(), value.to_string());
        }
    }

    /// Queue a failure for the next call of `op`.
    pub fn fail(&self, op: &'static str, error: RemoteError) {
        self.state
            .borrow_mut()
            .failures
            .entry(op)
            .or_default()
            .push_back(error);
    }

    /// Queue a quota answer; a healthy quota is returned once drained.
    pub fn push_quota(&self, quota: RemoteResult<Quota>) {
        self.state.borrow_mut().quotas.push_back(quota);
    }

    pub fn set_search_results(&self, repositories: Vec<Repository>) {
        self.state.borrow_mut().search = repositories;
    }

    /// Current values of a scope, secrets decrypted.
    pub fn values(&self, target: &ScopeRef) -> BTreeMap<String, String> {
        self.state
            .borrow()
            .entries
            .get(&target.to_string())
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.state.borrow().calls.iter().filter(|c| c.op == op).count()
    }

    /// Names passed to `op`, in call order.
    pub fn names(&self, op: &str) -> Vec<String> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.op == op)
            .filter_map(|c| c.name.clone())
            .collect()
    }

    /// Number of create, update, write and delete calls.
    pub fn mutations(&self) -> usize {
        ["put_secret", "update_variable", "create_variable", "delete_entry"]
            .iter()
            .map(|op| self.count(op))
            .sum()
    }

    fn record(&self, op: &'static str, name: Option<&str>) -> RemoteResult<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call {
            op,
            name: name.map(str::to_string),
        });
        match state.failures.get_mut(op).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn exists(&self, target: &ScopeRef, name: &str) -> bool {
        self.state
            .borrow()
            .entries
            .get(&target.to_string())
            .is_some_and(|scope| scope.contains_key(name))
    }

    fn store(&self, target: &ScopeRef, name: &str, value: String) {
        self.state
            .borrow_mut()
            .entries
            .entry(target.to_string())
            .or_default()
            .insert(name.to_string(), value);
    }
}

impl ScopeStore for FakeRemote {
    fn list_entries(&self, target: &ScopeRef, page: u32) -> RemoteResult<Page<String>> {
        self.record("list_entries", None)?;

        let names: Vec<String> = self.values(target).into_keys().collect();
        let start = (page as usize - 1) * self.page_size;
        let items: Vec<String> = names.iter().skip(start).take(self.page_size).cloned().collect();
        let next = (start + self.page_size < names.len()).then_some(page + 1);

        Ok(Page { items, next })
    }

    fn public_key(&self, _target: &ScopeRef) -> RemoteResult<PublicKey> {
        self.record("public_key", None)?;
        Ok(PublicKey {
            key_id: KEY_ID.to_string(),
            key: STANDARD.encode(self.secret.public_key().as_bytes()),
        })
    }

    fn put_secret(&self, target: &ScopeRef, payload: &EncryptedPayload) -> RemoteResult<Upsert> {
        self.record("put_secret", Some(&payload.name))?;
        assert_eq!(payload.key_id, KEY_ID, "payload sealed under unknown key");

        let value = SealedBox
            .decrypt(&payload.encrypted_value, &self.secret)
            .expect("payload should open with the fixture key");
        let existed = self.exists(target, &payload.name);
        self.store(target, &payload.name, value);

        Ok(if existed {
            Upsert::Updated
        } else {
            Upsert::Created
        })
    }

    fn update_variable(&self, target: &ScopeRef, name: &str, value: &str) -> RemoteResult<()> {
        self.record("update_variable", Some(name))?;
        if !self.exists(target, name) {
            return Err(not_found());
        }
        self.store(target, name, value.to_string());
        Ok(())
    }

    fn create_variable(&self, target: &ScopeRef, name: &str, value: &str) -> RemoteResult<()> {
        self.record("create_variable", Some(name))?;
        if self.exists(target, name) {
            return Err(RemoteError::status("POST", "/fake", 409, "Already exists"));
        }
        self.store(target, name, value.to_string());
        Ok(())
    }

    fn delete_entry(&self, target: &ScopeRef, name: &str) -> RemoteResult<()> {
        self.record("delete_entry", Some(name))?;
        let removed = self
            .state
            .borrow_mut()
            .entries
            .get_mut(&target.to_string())
            .and_then(|scope| scope.remove(name));
        match removed {
            Some(_) => Ok(()),
            None => Err(not_found()),
        }
    }
}

impl Repositories for FakeRemote {
    fn repository_id(&self, _repository: &Repository) -> RemoteResult<u64> {
        self.record("repository_id", None)?;
        Ok(self.repository_id)
    }

    fn search_page(&self, _query: &str, page: u32) -> RemoteResult<Page<Repository>> {
        self.record("search_page", None)?;

        let all = self.state.borrow().search.clone();
        let start = (page as usize - 1) * self.page_size;
        let items = all.iter().skip(start).take(self.page_size).cloned().collect();
        let next = (start + self.page_size < all.len()).then_some(page + 1);

        Ok(Page { items, next })
    }
}

impl RateLimits for FakeRemote {
    fn quota(&self) -> RemoteResult<Quota> {
        self.record("quota", None)?;
        let queued = self.state.borrow_mut().quotas.pop_front();
        queued.unwrap_or_else(|| Ok(healthy_quota()))
    }
}

pub fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

pub fn healthy_quota() -> Quota {
    Quota {
        limit: 5000,
        remaining: 4999,
        reset: epoch() + chrono::Duration::seconds(3600),
    }
}

/// Quota with `remaining` left, resetting `reset_in` seconds after [`epoch`].
pub fn quota(limit: u64, remaining: u64, reset_in: i64) -> Quota {
    Quota {
        limit,
        remaining,
        reset: epoch() + chrono::Duration::seconds(reset_in),
    }
}

/// Clock that records sleeps and advances instantly.
pub struct FakeClock {
    now: Cell<DateTime<Utc>>,
    sleeps: RefCell<Vec<Duration>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(epoch()),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        let step = chrono::Duration::from_std(duration).expect("sleep fits in chrono");
        self.now.set(self.now.get() + step);
    }
}
