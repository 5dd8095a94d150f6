//! One-bit branch predictor.
//!
//! Remembers the last outcome of each branch in a direct-mapped table and
//! predicts the same direction next time. Mispredicts twice per loop (once at
//! entry, once at exit), which the two-bit scheme fixes.

use super::direction::bht_index;
use super::DirectionPredictor;
use crate::common::{Address, Instruction};

/// One-bit last-outcome predictor.
pub struct OneBitPredictor {
    bht: Vec<bool>,
}

impl OneBitPredictor {
    /// Creates a predictor with `table_size` entries, all not-taken.
    pub fn new(table_size: usize) -> Self {
        Self {
            bht: vec![false; table_size],
        }
    }
}

impl DirectionPredictor for OneBitPredictor {
    fn predict(&self, pc: Address, _inst: Instruction) -> bool {
        self.bht[bht_index(pc, self.bht.len())]
    }

    fn update(&mut self, pc: Address, taken: bool) -> bool {
        let idx = bht_index(pc, self.bht.len());
        let matched = self.bht[idx] == taken;
        self.bht[idx] = taken;
        matched
    }
}
