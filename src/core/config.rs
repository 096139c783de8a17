//! Run configuration.
//!
//! Raw [`Options`] come from flags or environment variables. They are
//! validated into immutable [`Settings`] before any network call, so a bad
//! invocation never touches the remote.

use std::fmt;

use reqwest::Url;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::constants::{DEFAULT_API_URL, DEFAULT_MAX_RETRIES};
use crate::core::domain::{DesiredMapping, Repository, Scope, TargetType};
use crate::core::remote::RetryPolicy;
use crate::core::targets::TargetSelection;
use crate::error::{ConfigError, Result};

/// Unvalidated inputs.
#[derive(Clone)]
pub struct Options {
    pub target: Option<String>,
    pub query: Option<String>,
    pub token: String,
    pub api_url: String,
    pub target_type: TargetType,
    pub environment: Option<String>,
    pub secrets: String,
    pub variables: String,
    pub prune: bool,
    pub dry_run: bool,
    pub rate_limit: bool,
    pub max_retries: i64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            target: None,
            query: None,
            token: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            target_type: TargetType::default(),
            environment: None,
            secrets: String::new(),
            variables: String::new(),
            prune: false,
            dry_run: false,
            rate_limit: false,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// API token, wiped on drop and never printed.
#[derive(Clone)]
pub struct Token(Zeroizing<String>);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Validated run configuration.
#[derive(Debug)]
pub struct Settings {
    pub selection: TargetSelection,
    pub token: Token,
    pub api_url: String,
    pub target_type: TargetType,
    pub environment: Option<String>,
    pub secrets: DesiredMapping,
    pub variables: DesiredMapping,
    pub prune: bool,
    pub dry_run: bool,
    pub rate_limit: bool,
    pub retry: RetryPolicy,
}

impl Settings {
    /// Validate raw options.
    ///
    /// Blank strings count as unset, matching how CI runners pass empty
    /// inputs through the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an invalid target selection, repository,
    /// retry count, environment or API URL, and `ParseError` for malformed
    /// secrets or variables.
    pub fn from_options(options: Options) -> Result<Self> {
        let selection = match (non_blank(options.target), non_blank(options.query)) {
            (Some(target), None) => TargetSelection::Repository(Repository::parse(&target)?),
            (None, Some(query)) => TargetSelection::Query(query),
            _ => return Err(ConfigError::TargetSelection.into()),
        };

        if options.max_retries < 0 {
            return Err(ConfigError::NegativeRetries(options.max_retries).into());
        }
        let max_retries = u32::try_from(options.max_retries).unwrap_or(u32::MAX);

        let environment = non_blank(options.environment).map(|e| e.trim().to_string());
        if environment.is_some() && options.target_type != TargetType::Actions {
            return Err(ConfigError::EnvironmentUnsupported(options.target_type.to_string()).into());
        }

        let api_url = options.api_url.trim().to_string();
        match Url::parse(&api_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(ConfigError::InvalidApiUrl(api_url).into()),
        }

        let secrets = DesiredMapping::parse(&options.secrets)?;
        let variables = DesiredMapping::parse(&options.variables)?;

        let settings = Self {
            selection,
            token: Token::new(options.token),
            api_url,
            target_type: options.target_type,
            environment,
            secrets,
            variables,
            prune: options.prune,
            dry_run: options.dry_run,
            rate_limit: options.rate_limit,
            retry: RetryPolicy::new(max_retries),
        };
        debug!(?settings, "settings validated");
        Ok(settings)
    }

    /// Scopes to sync for each repository, with their desired mappings.
    ///
    /// Variables only exist for actions.
    pub fn scopes(&self) -> Vec<(Scope, &DesiredMapping)> {
        let environment = self.environment.as_deref();
        let mut scopes = vec![(
            Scope::secrets(self.target_type, environment),
            &self.secrets,
        )];
        if self.target_type.supports_variables() {
            scopes.push((Scope::variables(environment), &self.variables));
        }
        scopes
    }

    /// Variables were given for a type that cannot hold them.
    pub fn ignores_variables(&self) -> bool {
        !self.target_type.supports_variables() && !self.variables.is_empty()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ParseError};

    fn options() -> Options {
        Options {
            target: Some("octo/hello".into()),
            token: "t".into(),
            ..Options::default()
        }
    }

    #[test]
    fn test_valid_target() {
        let settings = Settings::from_options(options()).unwrap();
        assert_eq!(
            settings.selection,
            TargetSelection::Repository(Repository::new("octo", "hello"))
        );
        assert_eq!(settings.retry.max_attempts, 3);
    }

    #[test]
    fn test_target_and_query_exclusive() {
        let both = Options {
            query: Some("org:octo".into()),
            ..options()
        };
        assert!(matches!(
            Settings::from_options(both),
            Err(Error::Config(ConfigError::TargetSelection))
        ));

        let neither = Options {
            target: Some("  ".into()),
            ..options()
        };
        assert!(matches!(
            Settings::from_options(neither),
            Err(Error::Config(ConfigError::TargetSelection))
        ));
    }

    #[test]
    fn test_negative_retries() {
        let opts = Options {
            max_retries: -1,
            ..options()
        };
        assert!(matches!(
            Settings::from_options(opts),
            Err(Error::Config(ConfigError::NegativeRetries(-1)))
        ));
    }

    #[test]
    fn test_environment_only_with_actions() {
        let opts = Options {
            environment: Some("prod".into()),
            target_type: TargetType::Dependabot,
            ..options()
        };
        assert!(matches!(
            Settings::from_options(opts),
            Err(Error::Config(ConfigError::EnvironmentUnsupported(_)))
        ));
    }

    #[test]
    fn test_blank_environment_is_unset() {
        let opts = Options {
            environment: Some("".into()),
            target_type: TargetType::Codespaces,
            ..options()
        };
        let settings = Settings::from_options(opts).unwrap();
        assert_eq!(settings.environment, None);
    }

    #[test]
    fn test_malformed_secrets() {
        let opts = Options {
            secrets: "NOPE".into(),
            ..options()
        };
        assert!(matches!(
            Settings::from_options(opts),
            Err(Error::Parse(ParseError::MissingSeparator(_)))
        ));
    }

    #[test]
    fn test_invalid_api_url() {
        let opts = Options {
            api_url: "ftp://example.com".into(),
            ..options()
        };
        assert!(matches!(
            Settings::from_options(opts),
            Err(Error::Config(ConfigError::InvalidApiUrl(_)))
        ));
    }

    #[test]
    fn test_scopes_for_actions_environment() {
        let opts = Options {
            environment: Some("prod".into()),
            secrets: "A=1".into(),
            variables: "B=2".into(),
            ..options()
        };
        let settings = Settings::from_options(opts).unwrap();
        let scopes: Vec<Scope> = settings.scopes().into_iter().map(|(s, _)| s).collect();
        assert_eq!(
            scopes,
            vec![
                Scope::EnvironmentSecrets("prod".into()),
                Scope::EnvironmentVariables("prod".into()),
            ]
        );
    }

    #[test]
    fn test_dependabot_ignores_variables() {
        let opts = Options {
            target_type: TargetType::Dependabot,
            variables: "B=2".into(),
            ..options()
        };
        let settings = Settings::from_options(opts).unwrap();
        assert_eq!(settings.scopes().len(), 1);
        assert!(settings.ignores_variables());
    }

    #[test]
    fn test_debug_hides_token() {
        let opts = Options {
            token: "ghp_secret".into(),
            ..options()
        };
        let settings = Settings::from_options(opts).unwrap();
        assert!(!format!("{:?}", settings).contains("ghp_secret"));
    }
}
