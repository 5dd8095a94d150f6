//! Configuration system for the simulator.
//!
//! This module defines the configuration structures and enums used to
//! parameterize the model. It provides:
//! 1. **Defaults:** Baseline machine constants (memory size, predictor tables,
//!    ROB and reservation-station capacities, clock timing).
//! 2. **Structures:** Hierarchical config for memory, predictor, pipeline, and
//!    clock sections.
//! 3. **Predictor selection:** The `PredictorKind` enum with name-based lookup
//!    for the CLI.
//!
//! Use `Config::default()` for the baseline machine, or deserialize a config
//! from JSON when embedding the simulator.

use serde::Deserialize;

/// Default configuration constants for the simulator.
mod defaults {
    /// Size of the flat memory image in bytes (1 MiB).
    pub const MEMORY_SIZE: usize = 1024 * 1024;

    /// Branch History Table entry count. Must be a power of two.
    pub const BHT_SIZE: usize = 1024;

    /// Global History Register width in bits (gshare, tournament).
    pub const GHR_BITS: u32 = 8;

    /// Reorder buffer capacity.
    pub const ROB_ENTRIES: usize = 16;

    /// ALU reservation-station pool capacity.
    pub const RS_ALU_ENTRIES: usize = 8;

    /// Memory reservation-station pool capacity.
    pub const RS_MEM_ENTRIES: usize = 4;

    /// Branch reservation-station pool capacity.
    pub const RS_BRANCH_ENTRIES: usize = 2;

    /// Model clock period in nanoseconds (100 MHz).
    pub const CLOCK_PERIOD_NS: u64 = 10;

    /// Duration the reset signal stays asserted, in nanoseconds.
    pub const RESET_NS: u64 = 10;
}

/// Branch prediction scheme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorKind {
    /// Predict every branch not taken.
    AlwaysNotTaken,
    /// Predict every branch taken.
    AlwaysTaken,
    /// Backward taken, forward not taken, by the sign of the B-immediate.
    StaticBtfn,
    /// One-bit last-outcome table.
    OneBit,
    /// Two-bit saturating-counter table.
    #[default]
    TwoBit,
    /// Two-bit PHT indexed by `(pc >> 2) XOR GHR`.
    Gshare,
    /// Bimodal + global tables with a deterministic chooser.
    Tournament,
}

impl PredictorKind {
    /// Looks up a predictor by its CLI name.
    ///
    /// Returns `None` for unrecognized names so the caller can warn and fall
    /// back to the default.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "always_not_taken" => Some(PredictorKind::AlwaysNotTaken),
            "always_taken" => Some(PredictorKind::AlwaysTaken),
            "static_btfn" => Some(PredictorKind::StaticBtfn),
            "one_bit" => Some(PredictorKind::OneBit),
            "two_bit" => Some(PredictorKind::TwoBit),
            "gshare" => Some(PredictorKind::Gshare),
            "tournament" => Some(PredictorKind::Tournament),
            _ => None,
        }
    }

    /// The CLI name of this predictor.
    pub fn name(self) -> &'static str {
        match self {
            PredictorKind::AlwaysNotTaken => "always_not_taken",
            PredictorKind::AlwaysTaken => "always_taken",
            PredictorKind::StaticBtfn => "static_btfn",
            PredictorKind::OneBit => "one_bit",
            PredictorKind::TwoBit => "two_bit",
            PredictorKind::Gshare => "gshare",
            PredictorKind::Tournament => "tournament",
        }
    }
}

/// Root configuration structure containing all simulator settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Memory image configuration.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Branch predictor configuration.
    #[serde(default)]
    pub predictor: PredictorConfig,
    /// Backend capacity configuration.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Clock and reset timing.
    #[serde(default)]
    pub clock: ClockConfig,
}

/// Memory image configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Size of the flat byte-addressed image in bytes.
    #[serde(default = "MemoryConfig::default_size")]
    pub size: usize,
}

impl MemoryConfig {
    fn default_size() -> usize {
        defaults::MEMORY_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: defaults::MEMORY_SIZE,
        }
    }
}

/// Branch predictor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictorConfig {
    /// Prediction scheme.
    #[serde(default)]
    pub kind: PredictorKind,

    /// Prediction table entry count. Rounded up to a power of two so the
    /// index masks stay valid.
    #[serde(default = "PredictorConfig::default_table_size")]
    pub table_size: usize,

    /// Global History Register width in bits.
    #[serde(default = "PredictorConfig::default_history_bits")]
    pub history_bits: u32,
}

impl PredictorConfig {
    fn default_table_size() -> usize {
        defaults::BHT_SIZE
    }

    fn default_history_bits() -> u32 {
        defaults::GHR_BITS
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            kind: PredictorKind::default(),
            table_size: defaults::BHT_SIZE,
            history_bits: defaults::GHR_BITS,
        }
    }
}

/// Backend capacity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Reorder buffer capacity.
    #[serde(default = "PipelineConfig::default_rob")]
    pub rob_entries: usize,

    /// ALU reservation-station pool capacity.
    #[serde(default = "PipelineConfig::default_rs_alu")]
    pub rs_alu_entries: usize,

    /// Memory reservation-station pool capacity.
    #[serde(default = "PipelineConfig::default_rs_mem")]
    pub rs_mem_entries: usize,

    /// Branch reservation-station pool capacity.
    #[serde(default = "PipelineConfig::default_rs_branch")]
    pub rs_branch_entries: usize,
}

impl PipelineConfig {
    fn default_rob() -> usize {
        defaults::ROB_ENTRIES
    }

    fn default_rs_alu() -> usize {
        defaults::RS_ALU_ENTRIES
    }

    fn default_rs_mem() -> usize {
        defaults::RS_MEM_ENTRIES
    }

    fn default_rs_branch() -> usize {
        defaults::RS_BRANCH_ENTRIES
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rob_entries: defaults::ROB_ENTRIES,
            rs_alu_entries: defaults::RS_ALU_ENTRIES,
            rs_mem_entries: defaults::RS_MEM_ENTRIES,
            rs_branch_entries: defaults::RS_BRANCH_ENTRIES,
        }
    }
}

/// Clock and reset timing.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    /// Clock period in nanoseconds.
    #[serde(default = "ClockConfig::default_period")]
    pub period_ns: u64,

    /// Duration the reset signal stays asserted at startup, in nanoseconds.
    #[serde(default = "ClockConfig::default_reset")]
    pub reset_ns: u64,
}

impl ClockConfig {
    fn default_period() -> u64 {
        defaults::CLOCK_PERIOD_NS
    }

    fn default_reset() -> u64 {
        defaults::RESET_NS
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            period_ns: defaults::CLOCK_PERIOD_NS,
            reset_ns: defaults::RESET_NS,
        }
    }
}
