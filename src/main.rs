//! sync-secrets - reconcile GitHub secrets and variables.

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sync_secrets::cli::output;
use sync_secrets::cli::{execute, Cli};
use sync_secrets::core::build_info::BuildInfo;
use sync_secrets::core::constants::LOG_ENV;
use sync_secrets::error::{ConfigError, Error, RemoteError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("sync_secrets=debug")
        } else {
            EnvFilter::new("sync_secrets=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    debug!(build = %BuildInfo::current(), "starting");

    if let Err(e) = execute(&cli) {
        output::error(&e.to_string());
        if let Some(hint) = hint(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

/// Suggested fix for errors with an obvious one.
fn hint(error: &Error) -> Option<&'static str> {
    let remote = match error {
        Error::Config(ConfigError::TargetSelection) => {
            return Some("pass --target owner/name or --query <search>")
        }
        Error::Parse(_) => return Some("entries are KEY=VALUE lines or a JSON object of strings"),
        Error::Incomplete { .. } => return Some("see the errors above for each repository"),
        Error::Remote(e) => e,
        Error::Listing { source, .. }
        | Error::PublicKey { source, .. }
        | Error::Entry { source, .. } => source,
        _ => return None,
    };

    match remote {
        RemoteError::Status { status: 401, .. } => Some("check that GITHUB_TOKEN is valid"),
        RemoteError::Status { status: 403, .. } => {
            Some("the token may lack permission for this scope")
        }
        _ => None,
    }
}
