//! Scope reconciliation.
//!
//! Brings one remote scope in line with a desired mapping: list what
//! exists, delete what is no longer wanted when pruning, then write every
//! desired entry. Secrets are sealed under the scope's public key first.
//!
//! Dry-run lists for real but performs no mutating call and never fetches
//! the public key.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::core::cipher;
use crate::core::domain::{
    ActionKind, DesiredMapping, Repository, Scope, ScopeRef, SyncPlan, SyncReport, Upsert,
};
use crate::core::remote::Remote;
use crate::core::types::EntryName;
use crate::error::{Error, RemoteError, Result};

/// Reconciles scopes against desired mappings through a remote.
pub struct Synchronizer<'a, R: Remote + ?Sized> {
    remote: &'a R,
    dry_run: bool,
}

impl<'a, R: Remote + ?Sized> Synchronizer<'a, R> {
    pub fn new(remote: &'a R, dry_run: bool) -> Self {
        Self { remote, dry_run }
    }

    /// Bind a scope to a repository, looking up the numeric id if needed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Remote` if the id lookup fails.
    pub fn resolve(&self, repository: &Repository, scope: Scope) -> Result<ScopeRef> {
        let target = ScopeRef::new(repository.clone(), scope);
        if !target.scope.needs_repository_id() {
            return Ok(target);
        }

        let id = self.remote.repository_id(repository)?;
        debug!(repo = %repository, id, "resolved repository id");
        Ok(target.with_repository_id(id))
    }

    /// All entry names in a scope, across every page.
    ///
    /// # Errors
    ///
    /// Returns `Error::Listing` if any page fails; the partial set is
    /// discarded.
    pub fn list_existing(&self, target: &ScopeRef) -> Result<BTreeSet<EntryName>> {
        let mut names = BTreeSet::new();
        let mut page = 1;

        loop {
            let result = self
                .remote
                .list_entries(target, page)
                .map_err(|source| Error::Listing {
                    scope: target.to_string(),
                    source,
                })?;
            names.extend(result.items);

            match result.next {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        debug!(scope = %target, count = names.len(), pages = page, "listed existing entries");
        Ok(names)
    }

    /// Reconcile one scope.
    ///
    /// An empty mapping is skipped without any remote call, even when
    /// pruning. Entries are processed sorted by name and the first failing
    /// delete or write stops the scope; it is recorded in
    /// [`SyncReport::failure`] alongside the actions that did complete.
    ///
    /// # Errors
    ///
    /// Returns `Error::Listing` if the scope could not be listed.
    pub fn sync(
        &self,
        target: &ScopeRef,
        desired: &DesiredMapping,
        prune: bool,
    ) -> Result<SyncReport> {
        let mut report = SyncReport::new(target.clone());
        if desired.is_empty() {
            debug!(scope = %target, "nothing desired, skipping");
            return Ok(report);
        }

        let existing = if self.dry_run || prune {
            Some(self.list_existing(target)?)
        } else {
            None
        };
        let plan = SyncPlan::compute(existing, desired, prune);
        report.listed = plan.listed();

        if self.dry_run {
            report_intent(&plan, &mut report);
            return Ok(report);
        }

        let outcome = self
            .delete_all(target, &plan, &mut report)
            .and_then(|()| self.upsert_all(target, desired, &mut report));
        if let Err(e) = outcome {
            report.failure = Some(e);
        }

        Ok(report)
    }

    fn delete_all(&self, target: &ScopeRef, plan: &SyncPlan, report: &mut SyncReport) -> Result<()> {
        for name in &plan.to_delete {
            match self.remote.delete_entry(target, name) {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {
                    debug!(scope = %target, name = %name, "already gone");
                }
                Err(source) => return Err(entry_error("delete", name, target, source)),
            }
            info!(scope = %target, name = %name, "deleted");
            report.push(ActionKind::Deleted, name.as_str());
        }
        Ok(())
    }

    fn upsert_all(
        &self,
        target: &ScopeRef,
        desired: &DesiredMapping,
        report: &mut SyncReport,
    ) -> Result<()> {
        if target.scope.is_secret() {
            let key = self
                .remote
                .public_key(target)
                .map_err(|source| Error::PublicKey {
                    scope: target.to_string(),
                    source,
                })?;
            debug!(scope = %target, key_id = %key.key_id, "fetched public key");

            for (name, value) in desired.iter() {
                let payload = cipher::seal(&key, name, value)?;
                let outcome = self
                    .remote
                    .put_secret(target, &payload)
                    .map_err(|source| entry_error("write", name, target, source))?;
                record(target, report, name, outcome);
            }
        } else {
            for (name, value) in desired.iter() {
                let outcome = self
                    .remote
                    .put_variable(target, name, value)
                    .map_err(|source| entry_error("write", name, target, source))?;
                record(target, report, name, outcome);
            }
        }
        Ok(())
    }
}

fn record(target: &ScopeRef, report: &mut SyncReport, name: &str, outcome: Upsert) {
    let kind = ActionKind::from(outcome);
    info!(scope = %target, name, action = %kind, "written");
    report.push(kind, name);
}

fn report_intent(plan: &SyncPlan, report: &mut SyncReport) {
    for name in &plan.to_delete {
        report.push(ActionKind::WouldDelete, name.as_str());
    }
    for name in &plan.to_upsert {
        let kind = match plan.expected_upsert(name) {
            Some(Upsert::Updated) => ActionKind::WouldUpdate,
            _ => ActionKind::WouldCreate,
        };
        report.push(kind, name.as_str());
    }
}

fn entry_error(action: &'static str, name: &str, target: &ScopeRef, source: RemoteError) -> Error {
    Error::Entry {
        action,
        name: name.to_string(),
        scope: target.to_string(),
        source,
    }
}
