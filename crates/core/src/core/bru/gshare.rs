//! gshare branch predictor.
//!
//! Correlates global branch history with the program counter by XOR-hashing
//! the shifted PC with the Global History Register, so the same static branch
//! can be predicted differently in different execution contexts.

use super::direction::pht_index;
use super::DirectionPredictor;
use crate::common::{Address, Instruction};

/// gshare predictor: 2-bit counters indexed by `(pc >> 2) XOR GHR`.
pub struct GsharePredictor {
    /// Pattern History Table of 2-bit saturating counters.
    pht: Vec<u8>,
    /// Global History Register holding the most recent outcomes.
    ghr: u64,
    /// Mask limiting the GHR to the configured history width.
    ghr_mask: u64,
}

impl GsharePredictor {
    /// Creates a predictor with `table_size` counters and `history_bits` of
    /// global history, all counters weakly not-taken.
    pub fn new(table_size: usize, history_bits: u32) -> Self {
        Self {
            pht: vec![1; table_size],
            ghr: 0,
            ghr_mask: (1u64 << history_bits.min(63)) - 1,
        }
    }
}

impl DirectionPredictor for GsharePredictor {
    fn predict(&self, pc: Address, _inst: Instruction) -> bool {
        self.pht[pht_index(pc, self.ghr, self.pht.len())] >= 2
    }

    fn update(&mut self, pc: Address, taken: bool) -> bool {
        let idx = pht_index(pc, self.ghr, self.pht.len());
        let counter = self.pht[idx];
        let matched = (counter >= 2) == taken;

        if taken && counter < 3 {
            self.pht[idx] += 1;
        } else if !taken && counter > 0 {
            self.pht[idx] -= 1;
        }

        self.ghr = ((self.ghr << 1) | u64::from(taken)) & self.ghr_mask;
        matched
    }
}
