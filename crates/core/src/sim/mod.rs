//! Simulation driver.
//!
//! Binary loading and the clock/reset run loop around the processor core.

/// Program image loading.
pub mod loader;
/// Simulator: reset protocol and nanosecond-to-cycle conversion.
pub mod simulator;
