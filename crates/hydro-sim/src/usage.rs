//! Usage accumulator

use hydro_core::{FlowRate, HydroError, HydroResult, UsageTotal};

/// Usage accumulator configuration
#[derive(Clone, Debug)]
pub struct UsageConfig {
    /// Prior historical usage the running total starts from, in liters
    pub baseline_liters: f64,
}

impl Default for UsageConfig {
    fn default() -> Self {
        UsageConfig {
            baseline_liters: 1250.0,
        }
    }
}

impl UsageConfig {
    pub fn validate(&self) -> HydroResult<()> {
        if !self.baseline_liters.is_finite() || self.baseline_liters < 0.0 {
            return Err(HydroError::InvalidBaseline(self.baseline_liters));
        }
        Ok(())
    }
}

/// Integrates flow samples into a running usage total
///
/// Driven entirely by the signal tick; it has no timer of its own. With the
/// pump off the accumulator idles - the total is never reset.
#[derive(Debug)]
pub struct UsageAccumulator {
    total: UsageTotal,
}

impl UsageAccumulator {
    pub fn new() -> Self {
        Self::with_config(&UsageConfig::default())
    }

    pub fn with_config(config: &UsageConfig) -> Self {
        UsageAccumulator {
            total: UsageTotal::from_liters(config.baseline_liters),
        }
    }

    /// Fold one signal-tick sample into the total
    pub fn record(&mut self, sample: FlowRate, pump_on: bool) {
        if pump_on {
            self.total.accumulate(sample);
        }
    }

    #[inline]
    pub fn total(&self) -> UsageTotal {
        self.total
    }
}

impl Default for UsageAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
