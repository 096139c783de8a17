//! Build metadata.

use std::fmt;

/// Version and provenance of this binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Commit the binary was built from, when provided at build time.
    pub revision: Option<&'static str>,
    pub os: &'static str,
    pub arch: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            revision: option_env!("SYNC_SECRETS_REVISION"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sync-secrets {}", self.version)?;
        if let Some(revision) = self.revision {
            write!(f, " ({})", revision)?;
        }
        write!(f, " {}/{}", self.os, self.arch)
    }
}
