//! Credential scopes.
//!
//! A [`Scope`] names one of the remote credential stores. A [`ScopeRef`]
//! binds a scope to a concrete repository.

use std::fmt;

use crate::core::domain::Repository;
use crate::core::types::EnvironmentName;

/// Whether a scope holds sealed secrets or clear-text variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Secret,
    Variable,
}

/// Which automation product the run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetType {
    /// Workflow secrets and variables, optionally per environment.
    #[default]
    Actions,
    /// Dependency-update bot secrets.
    Dependabot,
    /// Cloud development environment secrets.
    Codespaces,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Actions => "actions",
            Self::Dependabot => "dependabot",
            Self::Codespaces => "codespaces",
        }
    }

    /// Whether this type has a variables store.
    pub fn supports_variables(&self) -> bool {
        matches!(self, Self::Actions)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    RepositorySecrets,
    RepositoryVariables,
    EnvironmentSecrets(EnvironmentName),
    EnvironmentVariables(EnvironmentName),
    BuildAutomationSecrets,
    CloudDevSecrets,
}

impl Scope {
    /// Secrets scope for a target type and optional environment.
    pub fn secrets(target: TargetType, environment: Option<&str>) -> Self {
        match (target, environment) {
            (TargetType::Actions, Some(env)) => Self::EnvironmentSecrets(env.to_string()),
            (TargetType::Actions, None) => Self::RepositorySecrets,
            (TargetType::Dependabot, _) => Self::BuildAutomationSecrets,
            (TargetType::Codespaces, _) => Self::CloudDevSecrets,
        }
    }

    /// Variables scope for an optional environment.
    pub fn variables(environment: Option<&str>) -> Self {
        match environment {
            Some(env) => Self::EnvironmentVariables(env.to_string()),
            None => Self::RepositoryVariables,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::RepositoryVariables | Self::EnvironmentVariables(_) => EntryKind::Variable,
            _ => EntryKind::Secret,
        }
    }

    pub fn is_secret(&self) -> bool {
        self.kind() == EntryKind::Secret
    }

    /// Environment secrets address the repository by numeric id.
    pub fn needs_repository_id(&self) -> bool {
        matches!(self, Self::EnvironmentSecrets(_))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RepositorySecrets => f.write_str("repository secrets"),
            Self::RepositoryVariables => f.write_str("repository variables"),
            Self::EnvironmentSecrets(env) => write!(f, "environment secrets ({})", env),
            Self::EnvironmentVariables(env) => write!(f, "environment variables ({})", env),
            Self::BuildAutomationSecrets => f.write_str("dependabot secrets"),
            Self::CloudDevSecrets => f.write_str("codespaces secrets"),
        }
    }
}

/// A scope bound to a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRef {
    pub repository: Repository,
    pub scope: Scope,
    /// Numeric repository id, resolved when the scope needs it.
    pub repository_id: Option<u64>,
}

impl ScopeRef {
    pub fn new(repository: Repository, scope: Scope) -> Self {
        Self {
            repository,
            scope,
            repository_id: None,
        }
    }

    pub fn with_repository_id(mut self, id: u64) -> Self {
        self.repository_id = Some(id);
        self
    }
}

impl fmt::Display for ScopeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.scope, self.repository)
    }
}
