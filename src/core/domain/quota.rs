//! Rate-limit quota snapshot.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::core::constants::RATE_LIMIT_SAFETY_MARGIN;

/// Remaining request budget of the shared rate-limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub limit: u64,
    pub remaining: u64,
    pub reset: DateTime<Utc>,
}

impl Quota {
    /// Whether `remaining/limit` is at or below `headroom`.
    ///
    /// A zero limit means the platform reported nothing usable.
    pub fn is_low(&self, headroom: f64) -> bool {
        if self.limit == 0 {
            return false;
        }
        (self.remaining as f64 / self.limit as f64) <= headroom
    }

    /// Time to wait from `now` until the window has reset.
    pub fn wait(&self, now: DateTime<Utc>) -> Duration {
        let until_reset = (self.reset - now).to_std().unwrap_or(Duration::ZERO);
        until_reset + RATE_LIMIT_SAFETY_MARGIN
    }
}
