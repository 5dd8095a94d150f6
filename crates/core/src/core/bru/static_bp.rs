//! Static branch prediction policies.
//!
//! Three schemes with no runtime state: always not-taken, always taken, and
//! backward-taken/forward-not-taken (BTFN), which predicts by the sign of the
//! branch offset so loop back-edges are assumed taken.

use super::DirectionPredictor;
use crate::common::{Address, Instruction};
use crate::isa::decode;

/// Fixed prediction policy.
#[derive(Clone, Copy, Debug)]
enum StaticPolicy {
    AlwaysNotTaken,
    AlwaysTaken,
    Btfn,
}

/// Static predictor carrying one of the fixed policies.
pub struct StaticPredictor {
    policy: StaticPolicy,
}

impl StaticPredictor {
    /// Predicts every branch not taken.
    pub fn always_not_taken() -> Self {
        Self {
            policy: StaticPolicy::AlwaysNotTaken,
        }
    }

    /// Predicts every branch taken.
    pub fn always_taken() -> Self {
        Self {
            policy: StaticPolicy::AlwaysTaken,
        }
    }

    /// Predicts backward branches taken and forward branches not taken.
    pub fn btfn() -> Self {
        Self {
            policy: StaticPolicy::Btfn,
        }
    }
}

impl DirectionPredictor for StaticPredictor {
    fn predict(&self, _pc: Address, inst: Instruction) -> bool {
        match self.policy {
            StaticPolicy::AlwaysNotTaken => false,
            StaticPolicy::AlwaysTaken => true,
            StaticPolicy::Btfn => decode::b_type_imm(inst) < 0,
        }
    }

    fn update(&mut self, _pc: Address, taken: bool) -> bool {
        match self.policy {
            StaticPolicy::AlwaysNotTaken => !taken,
            StaticPolicy::AlwaysTaken => taken,
            // The branch offset is not available at update time; score the
            // fall-through direction.
            StaticPolicy::Btfn => !taken,
        }
    }
}
