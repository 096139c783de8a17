//! Target repository selection.

use std::collections::HashSet;

use tracing::debug;

use crate::core::domain::Repository;
use crate::core::remote::Repositories;
use crate::error::Result;

/// Which repositories a run addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelection {
    /// A single `owner/name`.
    Repository(Repository),
    /// Every repository matched by a search query.
    Query(String),
}

/// Expand a selection into concrete repositories.
///
/// Search results are paged to the end and de-duplicated, keeping the
/// order the platform returned them in.
///
/// # Errors
///
/// Returns `Error::Remote` if a search page fails.
pub fn resolve_targets<R: Repositories + ?Sized>(
    remote: &R,
    selection: &TargetSelection,
) -> Result<Vec<Repository>> {
    let query = match selection {
        TargetSelection::Repository(repo) => return Ok(vec![repo.clone()]),
        TargetSelection::Query(query) => query,
    };

    let mut seen = HashSet::new();
    let mut repositories = Vec::new();
    let mut page = 1;

    loop {
        let result = remote.search_page(query, page)?;
        for repo in result.items {
            if seen.insert(repo.clone()) {
                repositories.push(repo);
            }
        }

        match result.next {
            Some(next) if next > page => page = next,
            _ => break,
        }
    }

    debug!(query = %query, count = repositories.len(), "search resolved");
    Ok(repositories)
}
