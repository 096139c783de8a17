//! Resource paths per scope.
//!
//! Paths are returned as unencoded segments; the client percent-encodes
//! them when joining onto the API base.

use crate::core::domain::{Scope, ScopeRef};
use crate::error::{RemoteError, RemoteResult};

/// Segments of the collection holding a scope's entries.
///
/// # Errors
///
/// Returns `RemoteError::Unresolved` for environment secrets whose
/// repository id has not been looked up.
pub fn collection_path(target: &ScopeRef) -> RemoteResult<Vec<String>> {
    let repo = |rest: &[&str]| -> Vec<String> {
        let mut segments = vec![
            "repos".to_string(),
            target.repository.owner().to_string(),
            target.repository.name().to_string(),
        ];
        segments.extend(rest.iter().map(|s| s.to_string()));
        segments
    };

    let segments = match &target.scope {
        Scope::RepositorySecrets => repo(&["actions", "secrets"]),
        Scope::RepositoryVariables => repo(&["actions", "variables"]),
        Scope::EnvironmentVariables(env) => repo(&["environments", env.as_str(), "variables"]),
        Scope::BuildAutomationSecrets => repo(&["dependabot", "secrets"]),
        Scope::CloudDevSecrets => repo(&["codespaces", "secrets"]),
        Scope::EnvironmentSecrets(env) => {
            let id = target.repository_id.ok_or_else(|| RemoteError::Unresolved {
                scope: target.to_string(),
            })?;
            vec![
                "repositories".to_string(),
                id.to_string(),
                "environments".to_string(),
                env.clone(),
                "secrets".to_string(),
            ]
        }
    };

    Ok(segments)
}

/// Segments addressing one entry.
pub fn entry_path(target: &ScopeRef, name: &str) -> RemoteResult<Vec<String>> {
    let mut segments = collection_path(target)?;
    segments.push(name.to_string());
    Ok(segments)
}

/// Segments of a secret scope's public key.
pub fn public_key_path(target: &ScopeRef) -> RemoteResult<Vec<String>> {
    let mut segments = collection_path(target)?;
    segments.push("public-key".to_string());
    Ok(segments)
}
