//! Leak probability scorer

use hydro_core::LeakProbability;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Leak scorer configuration
///
/// Ranges are half-open `[min, max)` in percent.
#[derive(Clone, Debug)]
pub struct ScorerConfig {
    /// Baseline noise score while the pump runs healthy
    pub base_min: f64,
    pub base_max: f64,
    /// Additional score when a fault is injected
    pub fault_min: f64,
    pub fault_max: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        ScorerConfig {
            base_min: 0.0,
            base_max: 20.0,
            fault_min: 60.0,
            fault_max: 80.0,
        }
    }
}

/// Produces one leak-probability score per scorer tick
pub struct LeakScorer {
    config: ScorerConfig,
    rng: StdRng,
}

impl LeakScorer {
    /// Create a scorer with default configuration and an entropy seed
    pub fn new() -> Self {
        Self::with_config(ScorerConfig::default())
    }

    /// Create a scorer with custom configuration and an entropy seed
    pub fn with_config(config: ScorerConfig) -> Self {
        LeakScorer {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a deterministic scorer for reproducible runs
    pub fn seeded(config: ScorerConfig, seed: u64) -> Self {
        LeakScorer {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw the next leak-probability score
    pub fn score(&mut self, pump_on: bool, fault_injected: bool) -> LeakProbability {
        if !pump_on {
            return LeakProbability::ZERO;
        }

        let mut raw = self.rng.gen_range(self.config.base_min..self.config.base_max);
        if fault_injected {
            raw += self.rng.gen_range(self.config.fault_min..self.config.fault_max);
        }

        LeakProbability::from_raw(raw)
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }
}

impl Default for LeakScorer {
    fn default() -> Self {
        Self::new()
    }
}
