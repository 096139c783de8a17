//! Command-line interface.
//!
//! Every flag also reads an environment variable so the binary runs
//! unchanged as a CI step.

pub mod output;
pub mod sync;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};

use crate::core::config::{Options, Settings};
use crate::core::constants::{DEFAULT_API_URL, DEFAULT_MAX_RETRIES};
use crate::core::domain::TargetType;
use crate::error::Result;

/// Sync secrets and variables into GitHub repositories.
#[derive(Parser)]
#[command(
    name = "sync-secrets",
    about = "Reconcile GitHub repository secrets and variables against a desired set",
    version
)]
pub struct Cli {
    /// Target repository as owner/name
    #[arg(long, env = "TARGET")]
    pub target: Option<String>,

    /// Repository search query; every match is synced
    #[arg(long, env = "QUERY")]
    pub query: Option<String>,

    /// API token
    #[arg(long = "github-token", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Which credential stores to sync
    #[arg(long = "type", env = "TYPE", value_enum, default_value_t = TypeArg::Actions)]
    pub target_type: TypeArg,

    /// Deployment environment (actions only)
    #[arg(long, env = "ENVIRONMENT")]
    pub environment: Option<String>,

    /// Secrets as KEY=VALUE lines or a JSON object
    #[arg(long, env = "SECRETS", hide_env_values = true)]
    pub secrets: Option<String>,

    /// Variables as KEY=VALUE lines or a JSON object
    #[arg(long, env = "VARIABLES", hide_env_values = true)]
    pub variables: Option<String>,

    /// Delete remote entries that are not desired
    #[arg(long, env = "PRUNE", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub prune: bool,

    /// Report intended changes without making them
    #[arg(long, env = "DRY_RUN", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub dry_run: bool,

    /// Pause when the API rate limit is nearly spent
    #[arg(long, env = "RATE_LIMIT", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub rate_limit: bool,

    /// Attempts per API call (0 and 1 both mean no retry)
    #[arg(long, env = "MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES, allow_negative_numbers = true)]
    pub max_retries: i64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Credential store family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TypeArg {
    Actions,
    Dependabot,
    Codespaces,
}

impl From<TypeArg> for TargetType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Actions => Self::Actions,
            TypeArg::Dependabot => Self::Dependabot,
            TypeArg::Codespaces => Self::Codespaces,
        }
    }
}

impl Cli {
    /// Raw options for validation.
    pub fn options(&self) -> Options {
        Options {
            target: self.target.clone(),
            query: self.query.clone(),
            token: self.token.clone(),
            api_url: self.api_url.clone(),
            target_type: self.target_type.into(),
            environment: self.environment.clone(),
            secrets: self.secrets.clone().unwrap_or_default(),
            variables: self.variables.clone().unwrap_or_default(),
            prune: self.prune,
            dry_run: self.dry_run,
            rate_limit: self.rate_limit,
            max_retries: self.max_retries,
        }
    }
}

/// Validate the invocation and run the sync.
///
/// # Errors
///
/// Returns validation errors before any network call, or the first
/// failure that stopped the run.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = Settings::from_options(cli.options())?;
    sync::execute(&settings, cli.verbose)
}
