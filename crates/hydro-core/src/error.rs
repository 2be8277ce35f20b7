//! Error types for the HydroSense engine

use thiserror::Error;

/// Engine configuration and runtime errors
///
/// The simulation itself is total: every tick computation is clamped and
/// cannot fail. Errors only arise at the runtime boundary, when wiring the
/// engine up with an invalid configuration.
#[derive(Error, Debug, PartialEq)]
pub enum HydroError {
    #[error("{name} interval must be non-zero")]
    ZeroInterval { name: &'static str },

    #[error("usage baseline must be a finite, non-negative number of liters, got {0}")]
    InvalidBaseline(f64),
}

/// Result type for HydroSense operations
pub type HydroResult<T> = Result<T, HydroError>;
