//! Per-scope sync outcome.

use std::fmt;

use crate::core::domain::ScopeRef;
use crate::core::types::EntryName;
use crate::error::Error;

/// Outcome of a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

/// A performed or intended action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Deleted,
    Created,
    Updated,
    WouldDelete,
    WouldCreate,
    WouldUpdate,
}

impl ActionKind {
    pub fn is_dry_run(&self) -> bool {
        matches!(
            self,
            Self::WouldDelete | Self::WouldCreate | Self::WouldUpdate
        )
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Deleted | Self::WouldDelete)
    }
}

impl From<Upsert> for ActionKind {
    fn from(upsert: Upsert) -> Self {
        match upsert {
            Upsert::Created => Self::Created,
            Upsert::Updated => Self::Updated,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Deleted => "deleted",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::WouldDelete => "would delete",
            Self::WouldCreate => "would create",
            Self::WouldUpdate => "would update",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub name: EntryName,
}

/// Ordered actions for one scope, and the failure that stopped it.
#[derive(Debug)]
pub struct SyncReport {
    pub target: ScopeRef,
    /// Number of existing entries, when the scope was listed.
    pub listed: Option<usize>,
    pub actions: Vec<Action>,
    pub failure: Option<Error>,
}

impl SyncReport {
    pub fn new(target: ScopeRef) -> Self {
        Self {
            target,
            listed: None,
            actions: Vec::new(),
            failure: None,
        }
    }

    pub(crate) fn push(&mut self, kind: ActionKind, name: impl Into<EntryName>) {
        self.actions.push(Action {
            kind,
            name: name.into(),
        });
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Number of delete actions.
    pub fn deleted(&self) -> usize {
        self.actions.iter().filter(|a| a.kind.is_delete()).count()
    }

    /// Number of create/update actions.
    pub fn upserted(&self) -> usize {
        self.actions.len() - self.deleted()
    }

    /// Names with the given action kind, in order.
    pub fn names(&self, kind: ActionKind) -> Vec<&str> {
        self.actions
            .iter()
            .filter(|a| a.kind == kind)
            .map(|a| a.name.as_str())
            .collect()
    }
}
