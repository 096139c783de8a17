//! Reconciliation plan.

use std::collections::BTreeSet;

use crate::core::domain::{DesiredMapping, Upsert};
use crate::core::types::EntryName;

/// What a sync will delete and write.
///
/// Upserts always overwrite; remote values are never readable so they are
/// never compared.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncPlan {
    /// `existing - desired`, sorted. Empty unless pruning.
    pub to_delete: Vec<EntryName>,
    /// Every desired name, sorted.
    pub to_upsert: Vec<EntryName>,
    existing: Option<BTreeSet<EntryName>>,
}

impl SyncPlan {
    /// Compute a plan.
    ///
    /// `existing` is `None` when the remote was not listed, in which case
    /// nothing can be deleted and create vs update is unknown.
    pub fn compute(
        existing: Option<BTreeSet<EntryName>>,
        desired: &DesiredMapping,
        prune: bool,
    ) -> Self {
        let to_delete = match (&existing, prune) {
            (Some(existing), true) => existing
                .iter()
                .filter(|name| !desired.contains(name))
                .cloned()
                .collect(),
            _ => Vec::new(),
        };

        Self {
            to_delete,
            to_upsert: desired.names().map(str::to_string).collect(),
            existing,
        }
    }

    /// Whether an upsert of `name` would create or update, when known.
    pub fn expected_upsert(&self, name: &str) -> Option<Upsert> {
        self.existing.as_ref().map(|existing| {
            if existing.contains(name) {
                Upsert::Updated
            } else {
                Upsert::Created
            }
        })
    }

    /// Number of entries found remotely, when listed.
    pub fn listed(&self) -> Option<usize> {
        self.existing.as_ref().map(BTreeSet::len)
    }
}
