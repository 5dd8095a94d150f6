//! Fetch stage.
//!
//! Owns the program counter and the branch predictor. Each cycle it applies a
//! pending branch redirect, reads the instruction at the PC, and speculates
//! the next PC: predicted-taken JAL and BRANCH targets are computed from the
//! instruction immediates, everything else falls through to `pc + 4`.

use crate::common::packets::FetchPacket;
use crate::common::{Address, Instruction};
use crate::config::PredictorConfig;
use crate::core::bru::BranchPredictor;
use crate::isa::{decode, opcodes};
use crate::mem::MemoryImage;

/// Fetch stage state.
pub struct FetchUnit {
    /// Current program counter.
    pub pc: Address,
    /// Direction predictor consulted for next-PC speculation.
    pub predictor: BranchPredictor,
}

impl FetchUnit {
    /// Creates a fetch unit at PC 0 with the configured predictor.
    pub fn new(config: &PredictorConfig) -> Self {
        Self {
            pc: 0,
            predictor: BranchPredictor::new(config),
        }
    }

    /// Resets the PC to zero.
    ///
    /// Predictor tables and accuracy counters are preserved across reset.
    pub fn reset(&mut self) {
        self.pc = 0;
    }

    /// Runs one fetch cycle.
    ///
    /// A `redirect` carries the target of a taken branch resolved on an
    /// earlier cycle and overrides the speculated PC before the read.
    pub fn tick(&mut self, redirect: Option<Address>, mem: &MemoryImage) -> FetchPacket {
        if let Some(target) = redirect {
            self.pc = target;
        }

        let pc = self.pc;
        let instruction = mem.read_instruction(pc);

        self.pc = self.predict_next_pc(pc, instruction);

        FetchPacket {
            instruction,
            pc,
            valid: true,
        }
    }

    /// Speculates the address of the next instruction.
    ///
    /// Predicted-taken JAL and BRANCH instructions redirect to `pc + imm`;
    /// JALR targets depend on a register value the frontend does not have, so
    /// they fall through until the branch unit resolves them.
    fn predict_next_pc(&mut self, pc: Address, inst: Instruction) -> Address {
        let op = decode::opcode(inst);

        if op == opcodes::OP_JAL || op == opcodes::OP_JALR || op == opcodes::OP_BRANCH {
            let taken = self.predictor.predict(pc, inst);
            if taken {
                if op == opcodes::OP_JAL {
                    return pc.wrapping_add(decode::j_type_imm(inst) as i64 as u64);
                }
                if op == opcodes::OP_BRANCH {
                    return pc.wrapping_add(decode::b_type_imm(inst) as i64 as u64);
                }
            }
        }

        pc.wrapping_add(4)
    }
}
