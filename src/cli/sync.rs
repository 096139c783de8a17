//! Sync command - converge every target repository's scopes.

use tracing::{debug, info};

use crate::cli::output;
use crate::core::build_info::BuildInfo;
use crate::core::config::Settings;
use crate::core::domain::{DesiredMapping, Repository, Scope, SyncReport};
use crate::core::remote::{GitHub, Governed, Remote, Retrying};
use crate::core::sync::Synchronizer;
use crate::core::targets::resolve_targets;
use crate::error::{Error, Result};

/// Build the layered client and sync.
pub fn execute(settings: &Settings, verbose: bool) -> Result<()> {
    if verbose {
        output::dimmed(&BuildInfo::current().to_string());
    }

    let client = GitHub::new(settings.token.expose(), &settings.api_url)?;
    let retrying = Retrying::new(client, settings.retry.clone());
    let remote: Box<dyn Remote> = if settings.rate_limit {
        Box::new(Governed::new(retrying))
    } else {
        Box::new(retrying)
    };

    run(remote.as_ref(), settings)
}

/// Sync every target repository through `remote`.
///
/// Repositories are processed in order; a failure stops the remaining
/// scopes of that repository only.
///
/// # Errors
///
/// Returns `Error::Incomplete` if any repository failed, or the search
/// error if targets could not be resolved.
pub fn run<R: Remote + ?Sized>(remote: &R, settings: &Settings) -> Result<()> {
    info!(
        dry_run = settings.dry_run,
        prune = settings.prune,
        target_type = %settings.target_type,
        "running sync"
    );

    if settings.ignores_variables() {
        output::warn(&format!(
            "variables are not supported for {} and will be ignored",
            settings.target_type
        ));
    }

    let scopes = settings.scopes();
    if scopes.iter().all(|(_, desired)| desired.is_empty()) {
        output::dimmed("nothing to sync");
        return Ok(());
    }

    let repositories = resolve_targets(remote, &settings.selection)?;
    if repositories.is_empty() {
        output::warn("no repositories matched");
        return Ok(());
    }

    let synchronizer = Synchronizer::new(remote, settings.dry_run);
    let mut failed = 0;

    for repository in &repositories {
        output::header(repository);
        match sync_repository(&synchronizer, repository, &scopes, settings.prune) {
            Ok(()) => info!(repo = %repository, "processed"),
            Err(e) => {
                output::error(&e.to_string());
                failed += 1;
            }
        }
    }

    let total = repositories.len();
    if failed > 0 {
        return Err(Error::Incomplete { failed, total });
    }

    let verb = if settings.dry_run { "checked" } else { "synced" };
    output::success(&format!("{} {} {}", total, plural(total), verb));
    Ok(())
}

fn sync_repository<R: Remote + ?Sized>(
    synchronizer: &Synchronizer<'_, R>,
    repository: &Repository,
    scopes: &[(Scope, &DesiredMapping)],
    prune: bool,
) -> Result<()> {
    for (scope, desired) in scopes {
        if desired.is_empty() {
            debug!(repo = %repository, scope = %scope, "empty mapping, skipped");
            continue;
        }

        let target = synchronizer.resolve(repository, scope.clone())?;
        let report = synchronizer.sync(&target, desired, prune)?;
        print_report(&report);

        if let Some(failure) = report.failure {
            return Err(failure);
        }
    }
    Ok(())
}

fn print_report(report: &SyncReport) {
    let mut summary = report.target.scope.to_string();
    if let Some(listed) = report.listed {
        summary.push_str(&format!(" ({} existing)", listed));
    }
    output::dimmed(&summary);

    for action in &report.actions {
        output::action(action);
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "repository"
    } else {
        "repositories"
    }
}
