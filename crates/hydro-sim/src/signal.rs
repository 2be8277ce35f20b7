//! Flow signal generator

use hydro_core::FlowRate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Signal generator configuration
///
/// Ranges are half-open `[min, max)` in liters per minute.
#[derive(Clone, Debug)]
pub struct SignalConfig {
    /// Healthy pump flow range
    pub base_min: f64,
    pub base_max: f64,
    /// Additional flow when a fault is injected
    pub fault_min: f64,
    pub fault_max: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        SignalConfig {
            base_min: 5.0,
            base_max: 8.0,
            fault_min: 8.0,
            fault_max: 12.0,
        }
    }
}

/// Produces one flow-rate sample per signal tick
///
/// The generator never blocks and never fails; with the pump off it emits
/// exactly zero.
pub struct SignalGenerator {
    config: SignalConfig,
    rng: StdRng,
}

impl SignalGenerator {
    /// Create a generator with default configuration and an entropy seed
    pub fn new() -> Self {
        Self::with_config(SignalConfig::default())
    }

    /// Create a generator with custom configuration and an entropy seed
    pub fn with_config(config: SignalConfig) -> Self {
        SignalGenerator {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a deterministic generator for reproducible runs
    pub fn seeded(config: SignalConfig, seed: u64) -> Self {
        SignalGenerator {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw the next flow sample
    pub fn sample(&mut self, pump_on: bool, fault_injected: bool) -> FlowRate {
        if !pump_on {
            return FlowRate::ZERO;
        }

        let mut rate = self.rng.gen_range(self.config.base_min..self.config.base_max);
        if fault_injected {
            rate += self.rng.gen_range(self.config.fault_min..self.config.fault_max);
        }

        FlowRate::from_l_per_min(rate)
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }
}

impl Default for SignalGenerator {
    fn default() -> Self {
        Self::new()
    }
}
