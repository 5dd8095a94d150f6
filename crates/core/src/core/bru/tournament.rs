//! Tournament branch predictor.
//!
//! A hybrid of a bimodal table (indexed by PC) and a global table (indexed by
//! PC XOR GHR). A deterministic chooser selects the global component when bit
//! 8 of the PC is set and the bimodal component otherwise; both components
//! train on every outcome regardless of which one was selected.

use super::direction::{bht_index, pht_index};
use super::two_bit::TwoBitState;
use super::DirectionPredictor;
use crate::common::{Address, Instruction};

/// Bit of the PC that selects the global component.
const CHOOSER_PC_BIT: u64 = 0x100;

/// Tournament predictor combining bimodal and global components.
pub struct TournamentPredictor {
    /// Bimodal component: two-bit states indexed by PC.
    bimodal: Vec<TwoBitState>,
    /// Global component: 2-bit counters indexed by `(pc >> 2) XOR GHR`.
    global: Vec<u8>,
    /// Global History Register shared with the global component.
    ghr: u64,
    /// Mask limiting the GHR to the configured history width.
    ghr_mask: u64,
}

impl TournamentPredictor {
    /// Creates a predictor with `table_size` entries per component and
    /// `history_bits` of global history.
    pub fn new(table_size: usize, history_bits: u32) -> Self {
        Self {
            bimodal: vec![TwoBitState::WeaklyNotTaken; table_size],
            global: vec![1; table_size],
            ghr: 0,
            ghr_mask: (1u64 << history_bits.min(63)) - 1,
        }
    }

    /// Whether the chooser selects the global component for this PC.
    #[inline]
    fn use_global(pc: Address) -> bool {
        pc & CHOOSER_PC_BIT != 0
    }

    fn bimodal_prediction(&self, pc: Address) -> bool {
        self.bimodal[bht_index(pc, self.bimodal.len())].predicts_taken()
    }

    fn global_prediction(&self, pc: Address) -> bool {
        self.global[pht_index(pc, self.ghr, self.global.len())] >= 2
    }
}

impl DirectionPredictor for TournamentPredictor {
    fn predict(&self, pc: Address, _inst: Instruction) -> bool {
        if Self::use_global(pc) {
            self.global_prediction(pc)
        } else {
            self.bimodal_prediction(pc)
        }
    }

    fn update(&mut self, pc: Address, taken: bool) -> bool {
        let selected = if Self::use_global(pc) {
            self.global_prediction(pc)
        } else {
            self.bimodal_prediction(pc)
        };
        let matched = selected == taken;

        let b_idx = bht_index(pc, self.bimodal.len());
        self.bimodal[b_idx] = self.bimodal[b_idx].advance(taken);

        let g_idx = pht_index(pc, self.ghr, self.global.len());
        let counter = self.global[g_idx];
        if taken && counter < 3 {
            self.global[g_idx] += 1;
        } else if !taken && counter > 0 {
            self.global[g_idx] -= 1;
        }

        self.ghr = ((self.ghr << 1) | u64::from(taken)) & self.ghr_mask;
        matched
    }
}
