//! Time source abstraction.
//!
//! The guard's decisions are entirely a function of "now", so the time source
//! is injected rather than read from the environment. Production code uses
//! [`SystemClock`]; tests drive a [`ManualClock`] to make window and spacing
//! behavior deterministic.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use thiserror::Error;

/// Errors reading the current time.
#[derive(Error, Debug)]
pub enum ClockError {
    /// The underlying time source could not produce a reading
    #[error("time source unavailable: {0}")]
    Unavailable(String),
}

/// A source of the current wall-clock time.
///
/// Implementors must be thread-safe; the guard shares one clock across all
/// callers. A clock failure is never propagated by the guard's evaluation
/// path, which degrades to a fail-closed decision instead.
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<DateTime<Utc>, ClockError>;
}

/// The default clock, backed by the system time in UTC.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<DateTime<Utc>, ClockError> {
        Ok(Utc::now())
    }
}

/// A manually-driven clock for deterministic tests.
///
/// Time only moves when [`advance`](ManualClock::advance) or
/// [`set`](ManualClock::set) is called. Share it with the guard via `Arc` and
/// keep a handle to step time between calls.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward by the given duration.
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    /// Set the clock to an absolute instant.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Result<DateTime<Utc>, ClockError> {
        Ok(*self.now.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_system_clock_reads_time() {
        let clock = SystemClock;
        let first = clock.now().unwrap();
        let second = clock.now().unwrap();
        assert!(second >= first);
    }

    #[test]
    fn test_manual_clock_is_frozen_until_advanced() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);

        assert_eq!(clock.now().unwrap(), start);
        assert_eq!(clock.now().unwrap(), start);

        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now().unwrap(), start + Duration::seconds(90));
    }

    #[test]
    fn test_manual_clock_set() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 2, 8, 30, 0).unwrap();
        let clock = ManualClock::new(start);

        clock.set(later);
        assert_eq!(clock.now().unwrap(), later);
    }
}
