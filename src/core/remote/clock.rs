use std::time::Duration;

use chrono::{DateTime, Utc};

/// Time source for backoff and quota waits.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Block the calling thread.
    fn sleep(&self, duration: Duration);
}

/// Wall clock with real sleeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}
