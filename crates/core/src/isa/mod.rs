//! RV32I instruction set definitions.
//!
//! This module groups the decoder and the opcode/function-code constant
//! tables, plus the opcode classification used for statistics attribution.

/// Field extraction, instruction formats, and immediate decoding.
pub mod decode;
/// funct3 constants for loads, stores, branches, and ALU operations.
pub mod funct3;
/// Major opcode constants.
pub mod opcodes;

use crate::common::Instruction;

/// Opcode class of a retired or in-flight instruction.
///
/// Used to key per-opcode statistics; every RV32I major opcode the decoder
/// recognizes has a class, and everything else is `Unknown`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpcodeClass {
    Lui,
    Auipc,
    Jal,
    Jalr,
    Branch,
    Load,
    Store,
    OpImm,
    Op,
    System,
    Unknown,
}

impl OpcodeClass {
    /// All classes, in report order.
    pub const ALL: [OpcodeClass; 11] = [
        OpcodeClass::Lui,
        OpcodeClass::Auipc,
        OpcodeClass::Jal,
        OpcodeClass::Jalr,
        OpcodeClass::Branch,
        OpcodeClass::Load,
        OpcodeClass::Store,
        OpcodeClass::OpImm,
        OpcodeClass::Op,
        OpcodeClass::System,
        OpcodeClass::Unknown,
    ];

    /// Classifies a raw instruction by its major opcode.
    pub fn from_inst(inst: Instruction) -> Self {
        Self::from_opcode(decode::opcode(inst))
    }

    /// Classifies a major opcode.
    pub fn from_opcode(op: u32) -> Self {
        match op {
            opcodes::OP_LUI => OpcodeClass::Lui,
            opcodes::OP_AUIPC => OpcodeClass::Auipc,
            opcodes::OP_JAL => OpcodeClass::Jal,
            opcodes::OP_JALR => OpcodeClass::Jalr,
            opcodes::OP_BRANCH => OpcodeClass::Branch,
            opcodes::OP_LOAD => OpcodeClass::Load,
            opcodes::OP_STORE => OpcodeClass::Store,
            opcodes::OP_IMM => OpcodeClass::OpImm,
            opcodes::OP_REG => OpcodeClass::Op,
            opcodes::OP_SYSTEM => OpcodeClass::System,
            _ => OpcodeClass::Unknown,
        }
    }

    /// Stable index into per-class statistics tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label used in reports.
    pub fn name(self) -> &'static str {
        match self {
            OpcodeClass::Lui => "LUI",
            OpcodeClass::Auipc => "AUIPC",
            OpcodeClass::Jal => "JAL",
            OpcodeClass::Jalr => "JALR",
            OpcodeClass::Branch => "BRANCH",
            OpcodeClass::Load => "LOAD",
            OpcodeClass::Store => "STORE",
            OpcodeClass::OpImm => "OP_IMM",
            OpcodeClass::Op => "OP",
            OpcodeClass::System => "SYSTEM",
            OpcodeClass::Unknown => "UNKNOWN",
        }
    }
}
