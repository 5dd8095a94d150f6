//! Inter-stage pipeline packets.
//!
//! Each channel between two stages holds exactly one packet per cycle. An
//! invalid packet (the `Default` value) models an empty pipeline bubble.

use crate::common::{Address, Instruction, RegisterValue};
use crate::isa::decode::InstrType;

/// Output of the fetch stage, consumed by decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchPacket {
    /// Raw instruction word read at `pc`.
    pub instruction: Instruction,
    /// Address the instruction was fetched from.
    pub pc: Address,
    /// Whether this packet carries an instruction at all.
    pub valid: bool,
}

/// Output of the decode stage, consumed by issue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodePacket {
    /// Raw instruction word, kept for statistics attribution.
    pub instruction: Instruction,
    /// Address the instruction was fetched from.
    pub pc: Address,
    /// Instruction format derived from the opcode.
    pub ty: InstrType,
    /// Major opcode (bits 6:0).
    pub opcode: u32,
    /// funct3 field (bits 14:12).
    pub funct3: u32,
    /// funct7 field (bits 31:25).
    pub funct7: u32,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Destination register index.
    pub rd: usize,
    /// Sign-extended immediate for the instruction format.
    pub imm: i32,
    /// Whether this packet carries an instruction at all.
    pub valid: bool,
}

/// Result of a resolved operation, surfaced by the execution engine so the
/// orchestrator can train the branch predictor and redirect fetch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecutePacket {
    /// Raw instruction word (zero when not needed downstream).
    pub instruction: Instruction,
    /// Address of the resolved instruction.
    pub pc: Address,
    /// Destination register index.
    pub rd: usize,
    /// Computed result (link address for jumps, zero for branches and stores).
    pub result: RegisterValue,
    /// Whether the operation touched memory.
    pub mem_access: bool,
    /// Whether the operation was a store.
    pub mem_write: bool,
    /// Effective memory address for loads and stores.
    pub mem_addr: Address,
    /// Data recorded for a deferred store.
    pub mem_data: RegisterValue,
    /// Resolved branch direction.
    pub branch_taken: bool,
    /// Resolved branch target (only meaningful when `branch_taken`).
    pub branch_target: Address,
    /// Whether this packet carries a result at all.
    pub valid: bool,
}
