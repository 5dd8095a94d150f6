//! Two-bit saturating-counter branch predictor.
//!
//! Each branch maps to a four-state counter that must mispredict twice before
//! the predicted direction flips, so a single anomalous outcome (e.g. a loop
//! exit) does not disturb a stable pattern.

use super::direction::bht_index;
use super::DirectionPredictor;
use crate::common::{Address, Instruction};

/// Saturating counter state for the two-bit scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TwoBitState {
    StronglyNotTaken,
    WeaklyNotTaken,
    WeaklyTaken,
    StronglyTaken,
}

impl TwoBitState {
    /// The direction this state predicts.
    #[inline]
    pub fn predicts_taken(self) -> bool {
        matches!(self, TwoBitState::WeaklyTaken | TwoBitState::StronglyTaken)
    }

    /// The next state after observing an outcome; saturates at the ends.
    pub fn advance(self, taken: bool) -> Self {
        match (self, taken) {
            (TwoBitState::StronglyNotTaken, true) => TwoBitState::WeaklyNotTaken,
            (TwoBitState::WeaklyNotTaken, true) => TwoBitState::WeaklyTaken,
            (TwoBitState::WeaklyTaken, true) => TwoBitState::StronglyTaken,
            (TwoBitState::StronglyTaken, true) => TwoBitState::StronglyTaken,
            (TwoBitState::StronglyNotTaken, false) => TwoBitState::StronglyNotTaken,
            (TwoBitState::WeaklyNotTaken, false) => TwoBitState::StronglyNotTaken,
            (TwoBitState::WeaklyTaken, false) => TwoBitState::WeaklyNotTaken,
            (TwoBitState::StronglyTaken, false) => TwoBitState::WeaklyTaken,
        }
    }
}

/// Two-bit saturating-counter predictor.
pub struct TwoBitPredictor {
    bht: Vec<TwoBitState>,
}

impl TwoBitPredictor {
    /// Creates a predictor with `table_size` entries, all weakly not-taken.
    pub fn new(table_size: usize) -> Self {
        Self {
            bht: vec![TwoBitState::WeaklyNotTaken; table_size],
        }
    }
}

impl DirectionPredictor for TwoBitPredictor {
    fn predict(&self, pc: Address, _inst: Instruction) -> bool {
        self.bht[bht_index(pc, self.bht.len())].predicts_taken()
    }

    fn update(&mut self, pc: Address, taken: bool) -> bool {
        let idx = bht_index(pc, self.bht.len());
        let state = self.bht[idx];
        let matched = state.predicts_taken() == taken;
        self.bht[idx] = state.advance(taken);
        matched
    }
}
