//! Clock capability
//!
//! Operations capture a single `now` and reuse it for every timestamp they
//! derive, so window boundaries never skew across repeated reads.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Time source
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Controllable clock for tests and simulations
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `initial`
    pub fn new(initial: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(initial),
        }
    }

    /// Move the clock forward
    pub fn advance_seconds(&self, seconds: i64) {
        let mut current = self.current.lock();
        *current += Duration::seconds(seconds);
    }

    /// Set the clock to an absolute time
    pub fn set(&self, time: DateTime<Utc>) {
        *self.current.lock() = time;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}
