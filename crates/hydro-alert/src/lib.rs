//! HydroSense Alert - decision layer
//!
//! Two pieces sit between the leak scorer and the outside world:
//! - `AlertMachine`: hysteresis over the leak score, edge-triggered raise
//! - `NotificationBoard`: one transient message with a replaceable expiry

pub mod machine;
pub mod notify;

pub use machine::*;
pub use notify::*;
