//! Cycle-driven out-of-order RV32I core model.
//!
//! This crate implements a speculative, dynamically scheduled RV32I processor
//! simulator built around a Tomasulo-style backend with a reorder buffer:
//! 1. **Frontend:** Fetch with pluggable branch prediction and a stateless decoder.
//! 2. **Backend:** Issue into typed reservation stations, single-cycle functional
//!    units, result broadcast over a common data bus, and in-order ROB commit.
//! 3. **Memory:** A flat little-endian byte image loaded from a raw binary.
//! 4. **Simulation:** Reset protocol, nanosecond-to-cycle conversion, and a
//!    per-cycle orchestrator that wires the stages together.
//! 5. **Statistics:** Per-opcode and per-type pipeline occupancy, hazard
//!    counters, branch-prediction accuracy, and report/CSV export.

/// Shared type aliases and inter-stage packet definitions.
pub mod common;
/// Simulator configuration (defaults, predictor selection, capacities).
pub mod config;
/// Processor core (orchestrator, fetch, decode, execution engine, predictors).
pub mod core;
/// Instruction set: opcodes, function codes, and field/immediate decoding.
pub mod isa;
/// Flat memory image with little-endian instruction and data access.
pub mod mem;
/// Simulation driver: binary loading, reset, and the run loop.
pub mod sim;
/// Performance statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` for the baseline machine.
pub use crate::config::Config;
/// Top-level processor model; advanced one cycle at a time via `tick`.
pub use crate::core::Processor;
/// Simulation driver owning the processor and the clock/reset protocol.
pub use crate::sim::simulator::Simulator;
