//! Error types.
//!
//! One top-level [`Error`] wraps the domain-specific enums so that `?`
//! works across module boundaries while callers can still match on the
//! failure kind.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Listing existing entries failed part way; nothing was pruned.
    #[error("failed to list existing entries in {scope}: {source}")]
    Listing {
        scope: String,
        #[source]
        source: RemoteError,
    },

    /// The sealing key for a secret scope could not be fetched.
    #[error("failed to get public key for {scope}: {source}")]
    PublicKey {
        scope: String,
        #[source]
        source: RemoteError,
    },

    /// A single delete or upsert call failed and aborted its phase.
    #[error("failed to {action} {name} in {scope}: {source}")]
    Entry {
        action: &'static str,
        name: String,
        scope: String,
        #[source]
        source: RemoteError,
    },

    /// Some repositories in a batch did not converge.
    #[error("{failed} of {total} repositories failed to sync")]
    Incomplete { failed: usize, total: usize },
}

/// Invalid invocation, detected before any network call.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("either --target or --query must be set, not both")]
    TargetSelection,

    #[error("invalid repository format: {0} (expected owner/name)")]
    InvalidRepository(String),

    #[error("max-retries cannot be less than 0 (got {0})")]
    NegativeRetries(i64),

    #[error("--environment is only supported with --type actions (got {0})")]
    EnvironmentUnsupported(String),

    #[error("invalid api url: {0}")]
    InvalidApiUrl(String),

    #[error("token contains characters not allowed in a header")]
    InvalidToken,
}

/// Malformed desired-mapping input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed entry, does not contain a key=value pair: {0} (if you see '***', the CI runner may be masking the value; check the input format)")]
    MissingSeparator(String),

    #[error("malformed entry, key or value is empty: {0}")]
    EmptyKeyOrValue(String),

    #[error("malformed JSON entry: key is empty")]
    EmptyJsonKey,

    #[error("malformed JSON entry: value is empty for key {0}")]
    EmptyJsonValue(String),

    #[error("failed to parse JSON entries: {0}")]
    Json(String),

    #[error("duplicate entry after upper-casing: {0}")]
    Duplicate(String),
}

/// Sealing failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CipherError {
    #[error("invalid public key {key_id}: {reason}")]
    InvalidKey { key_id: String, reason: String },

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
}

/// A call to the remote platform failed.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("{method} {path} returned {status}: {message}")]
    Status {
        method: String,
        path: String,
        status: u16,
        message: String,
        /// Set when the platform reported an exhausted rate limit.
        rate_limited: bool,
    },

    #[error("request to {path} failed: {reason}")]
    Transport { path: String, reason: String },

    #[error("unexpected response from {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("{scope} is addressed by repository id, which was not resolved")]
    Unresolved { scope: String },
}

impl RemoteError {
    /// Build a status error without rate-limit information.
    pub fn status(method: &str, path: &str, status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            method: method.to_string(),
            path: path.to_string(),
            status,
            message: message.into(),
            rate_limited: false,
        }
    }

    /// HTTP status, if the platform answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the addressed resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Whether retrying the same call may succeed.
    ///
    /// Transport failures, timeouts, throttling and server errors are
    /// transient. Everything else (bad credentials, missing resources,
    /// validation failures) will fail the same way again.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Decode { .. } | Self::Unresolved { .. } => false,
            Self::Status {
                status,
                rate_limited,
                ..
            } => *rate_limited || matches!(status, 408 | 429 | 500..=599),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Result of a single remote call.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;
