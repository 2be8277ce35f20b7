//! Time primitives for the HydroSense engine
//!
//! All scheduling and expiry logic works on `SimTime`, a millisecond
//! timestamp relative to the session epoch. Logic code never reads a wall
//! clock directly; it takes `now: SimTime` parameters so tests can drive
//! time deterministically. The live runtime produces `SimTime` values from
//! a `MonotonicClock`.

use std::ops::{Add, Sub};
use std::time::{Duration, Instant};

/// Session-relative timestamp in milliseconds
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimTime(pub i64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub const MAX: SimTime = SimTime(i64::MAX);

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        SimTime(millis)
    }

    #[inline]
    pub fn from_secs(secs: i64) -> Self {
        SimTime(secs * 1000)
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        SimTime(self.0.saturating_add(duration.as_millis() as i64))
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        SimTime(self.0 + rhs.as_millis() as i64)
    }
}

impl Sub<SimTime> for SimTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: SimTime) -> Self::Output {
        let diff = self.0 - rhs.0;
        if diff >= 0 {
            Duration::from_millis(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl std::fmt::Debug for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t+{}ms", self.0)
    }
}

/// Monotonic session clock backed by the OS clock
///
/// INVARIANT: readings never decrease; the session epoch is fixed at
/// construction.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    /// Session epoch
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose epoch is now
    pub fn start() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }

    /// Current session time
    pub fn now(&self) -> SimTime {
        SimTime(self.origin.elapsed().as_millis() as i64)
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}
