//! Measurement newtypes
//!
//! The engine works in three units: liters per minute (flow), liters
//! (accumulated usage), and percent (leak probability). Each gets a newtype
//! that enforces its range invariant at construction, so invalid values
//! cannot escape into the published state.

/// Round to one decimal place, the display precision used for flow and usage
#[inline]
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Instantaneous flow rate in liters per minute
///
/// INVARIANT: non-negative, one decimal place of precision.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct FlowRate(f64);

impl FlowRate {
    pub const ZERO: FlowRate = FlowRate(0.0);

    /// Construct from a raw sample, clamping below at zero and rounding to
    /// one decimal place
    pub fn from_l_per_min(raw: f64) -> Self {
        FlowRate(round_tenths(raw.max(0.0)))
    }

    #[inline]
    pub fn as_l_per_min(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl std::fmt::Debug for FlowRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} L/min", self.0)
    }
}

/// Accumulated water usage in liters
///
/// INVARIANT: non-negative and monotonically non-decreasing; `accumulate`
/// is the only mutation.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct UsageTotal(f64);

impl UsageTotal {
    pub const ZERO: UsageTotal = UsageTotal(0.0);

    /// Construct a baseline total (prior historical usage)
    pub fn from_liters(liters: f64) -> Self {
        UsageTotal(round_tenths(liters.max(0.0)))
    }

    #[inline]
    pub fn as_liters(self) -> f64 {
        self.0
    }

    /// Fold one flow sample into the total: a one-second tick at
    /// `rate` L/min contributes `rate / 60` liters
    pub fn accumulate(&mut self, rate: FlowRate) {
        self.0 = round_tenths(self.0 + rate.as_l_per_min() / 60.0);
    }
}

impl std::fmt::Debug for UsageTotal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} L", self.0)
    }
}

/// Leak probability score in percent
///
/// INVARIANT: always within [0, 100].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LeakProbability(u8);

impl LeakProbability {
    pub const ZERO: LeakProbability = LeakProbability(0);
    pub const MAX: LeakProbability = LeakProbability(100);

    /// Construct from a raw score, rounding to the nearest integer and
    /// clamping into [0, 100]
    pub fn from_raw(raw: f64) -> Self {
        LeakProbability(raw.round().clamp(0.0, 100.0) as u8)
    }

    /// Construct from an integer percent, clamping into [0, 100]
    pub fn from_percent(percent: u8) -> Self {
        LeakProbability(percent.min(100))
    }

    #[inline]
    pub fn as_percent(self) -> u8 {
        self.0
    }
}

impl std::fmt::Debug for LeakProbability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
