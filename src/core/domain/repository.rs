//! Repository type.

use std::fmt;

use crate::error::ConfigError;

/// A repository addressed by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Repository {
    owner: String,
    name: String,
}

impl Repository {
    /// Create from owner and name.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse an `owner/name` string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRepository` unless both parts are
    /// present and non-empty.
    pub fn parse(full_name: &str) -> Result<Self, ConfigError> {
        match full_name.trim().split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(owner, name))
            }
            _ => Err(ConfigError::InvalidRepository(full_name.to_string())),
        }
    }

    /// Owning user or organization.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
