//! Branch prediction unit.
//!
//! This module contains the direction predictors available to the fetch
//! stage: static policies (always not-taken, always taken, backward-taken
//! forward-not-taken), one-bit and two-bit history tables, gshare, and a
//! bimodal/global tournament predictor.

pub use self::direction::DirectionPredictor;

/// Direction predictor trait shared by all schemes.
pub mod direction;

/// gshare predictor (PHT indexed by `(pc >> 2) XOR GHR`).
pub mod gshare;

/// One-bit last-outcome predictor.
pub mod one_bit;

/// Static prediction policies (no runtime state).
pub mod static_bp;

/// Tournament predictor (bimodal + global with a deterministic chooser).
pub mod tournament;

/// Two-bit saturating-counter predictor.
pub mod two_bit;

use self::{
    gshare::GsharePredictor, one_bit::OneBitPredictor, static_bp::StaticPredictor,
    tournament::TournamentPredictor, two_bit::TwoBitPredictor,
};
use crate::common::{Address, Instruction};
use crate::config::{PredictorConfig, PredictorKind};
use crate::isa::{decode, opcodes};

/// Enum wrapper for static dispatch of the direction predictors.
enum PredictorImpl {
    Static(StaticPredictor),
    OneBit(OneBitPredictor),
    TwoBit(TwoBitPredictor),
    Gshare(GsharePredictor),
    Tournament(TournamentPredictor),
}

/// Branch predictor used by the fetch stage.
///
/// Wraps the configured direction scheme and keeps the prediction accuracy
/// counters: `predict` counts every query for a control-flow instruction, and
/// `update` counts the queries whose stored prediction matched the outcome.
pub struct BranchPredictor {
    imp: PredictorImpl,
    total_predictions: u64,
    correct_predictions: u64,
}

impl BranchPredictor {
    /// Creates a predictor from the configuration.
    ///
    /// The table size is rounded up to a power of two so the index masks
    /// stay valid.
    pub fn new(config: &PredictorConfig) -> Self {
        let table_size = config.table_size.max(1).next_power_of_two();
        let imp = match config.kind {
            PredictorKind::AlwaysNotTaken => {
                PredictorImpl::Static(StaticPredictor::always_not_taken())
            }
            PredictorKind::AlwaysTaken => PredictorImpl::Static(StaticPredictor::always_taken()),
            PredictorKind::StaticBtfn => PredictorImpl::Static(StaticPredictor::btfn()),
            PredictorKind::OneBit => PredictorImpl::OneBit(OneBitPredictor::new(table_size)),
            PredictorKind::TwoBit => PredictorImpl::TwoBit(TwoBitPredictor::new(table_size)),
            PredictorKind::Gshare => {
                PredictorImpl::Gshare(GsharePredictor::new(table_size, config.history_bits))
            }
            PredictorKind::Tournament => PredictorImpl::Tournament(TournamentPredictor::new(
                table_size,
                config.history_bits,
            )),
        };
        Self {
            imp,
            total_predictions: 0,
            correct_predictions: 0,
        }
    }

    /// Predicts the direction of the instruction at `pc`.
    ///
    /// Returns false unconditionally for non-control opcodes; those queries
    /// are not counted. Every BRANCH/JAL/JALR query increments the total.
    pub fn predict(&mut self, pc: Address, inst: Instruction) -> bool {
        let op = decode::opcode(inst);
        if op != opcodes::OP_BRANCH && op != opcodes::OP_JAL && op != opcodes::OP_JALR {
            return false;
        }

        self.total_predictions += 1;
        match &self.imp {
            PredictorImpl::Static(p) => p.predict(pc, inst),
            PredictorImpl::OneBit(p) => p.predict(pc, inst),
            PredictorImpl::TwoBit(p) => p.predict(pc, inst),
            PredictorImpl::Gshare(p) => p.predict(pc, inst),
            PredictorImpl::Tournament(p) => p.predict(pc, inst),
        }
    }

    /// Trains the predictor with a resolved outcome.
    ///
    /// Scores the stored prediction against `taken` before the tables are
    /// updated, so accuracy reflects what fetch would have been told.
    pub fn update(&mut self, pc: Address, taken: bool) {
        let matched = match &mut self.imp {
            PredictorImpl::Static(p) => p.update(pc, taken),
            PredictorImpl::OneBit(p) => p.update(pc, taken),
            PredictorImpl::TwoBit(p) => p.update(pc, taken),
            PredictorImpl::Gshare(p) => p.update(pc, taken),
            PredictorImpl::Tournament(p) => p.update(pc, taken),
        };
        if matched {
            self.correct_predictions += 1;
        }
    }

    /// Total direction queries for control-flow instructions.
    pub fn total_predictions(&self) -> u64 {
        self.total_predictions
    }

    /// Queries whose stored prediction matched the resolved outcome.
    pub fn correct_predictions(&self) -> u64 {
        self.correct_predictions
    }

    /// Prediction accuracy in [0, 1]; zero before any prediction.
    pub fn accuracy(&self) -> f64 {
        if self.total_predictions == 0 {
            return 0.0;
        }
        let correct = self.correct_predictions.min(self.total_predictions);
        correct as f64 / self.total_predictions as f64
    }
}
