//! HydroSense Test Harness - deterministic scenario simulation
//!
//! This crate provides:
//! - A scenario runner that drives a monitor with seeded RNGs and
//!   simulated time, firing ticks in the order the live runtime would
//! - End-to-end scenario tests for the monitor's observable behaviors

pub mod scenario;

pub use scenario::*;
