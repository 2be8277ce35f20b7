//! HydroSense Runtime - monitor orchestration and timer loop
//!
//! The `Monitor` owns the single shared state and exposes:
//! - synchronous tick functions (`signal_tick`, `scorer_tick`) so tests and
//!   harnesses can drive the engine without timers
//! - the control surface (`toggle_pump`, `toggle_fault`,
//!   `emergency_shut_off`)
//! - the read surface (`snapshot` plus per-field accessors and display
//!   projections)
//!
//! `MonitorHandle` runs the monitor live: two cancelable tokio interval
//! tasks (1 s signal, 3 s scorer) and one replaceable deferred task per
//! posted notification.

pub mod monitor;
pub mod handle;

pub use monitor::*;
pub use handle::*;
