//! Constants used throughout sync-secrets.
//!
//! Centralizes wire-level values and tuning knobs.

use std::time::Duration;

/// Default REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Media type requested on every call.
pub const ACCEPT: &str = "application/vnd.github+json";

/// REST API version pinned on every call.
pub const API_VERSION: &str = "2022-11-28";

/// Page size for list and search calls (the platform maximum).
pub const PER_PAGE: u32 = 100;

/// Default attempt budget for each remote call.
pub const DEFAULT_MAX_RETRIES: i64 = 3;

/// Remaining/limit ratio at or below which the governor pauses.
pub const RATE_LIMIT_HEADROOM: f64 = 0.05;

/// Extra wait added past the quota reset instant.
pub const RATE_LIMIT_SAFETY_MARGIN: Duration = Duration::from_secs(1);

/// Backoff: delay before the first retry.
pub const BACKOFF_INITIAL_INTERVAL: Duration = Duration::from_millis(500);

/// Backoff: growth factor between retries.
pub const BACKOFF_MULTIPLIER: f64 = 1.5;

/// Backoff: jitter applied to every delay (0.5 = ±50%).
pub const BACKOFF_RANDOMIZATION_FACTOR: f64 = 0.5;

/// Backoff: ceiling for a single delay.
pub const BACKOFF_MAX_INTERVAL: Duration = Duration::from_secs(60);

/// Backoff: overall time budget across all attempts of one call.
pub const BACKOFF_MAX_ELAPSED: Duration = Duration::from_secs(15 * 60);

/// Environment variable consulted for the log filter.
pub const LOG_ENV: &str = "SYNC_SECRETS_LOG";

/// Per-request timeout, connect included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
