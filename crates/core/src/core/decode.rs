//! Decode stage.
//!
//! Stateless field extraction: turns a fetched instruction word into a
//! [`DecodePacket`] with register indices, function codes, the instruction
//! format, and the sign-extended immediate. Invalid input propagates as an
//! invalid packet.

use crate::common::packets::{DecodePacket, FetchPacket};
use crate::isa::decode;

/// Decode stage.
pub struct DecodeUnit;

impl DecodeUnit {
    /// Creates the decode stage.
    pub fn new() -> Self {
        Self
    }

    /// Decodes one fetch packet.
    pub fn tick(&self, fetch: &FetchPacket) -> DecodePacket {
        if !fetch.valid {
            return DecodePacket::default();
        }

        let d = decode::decode(fetch.instruction);
        DecodePacket {
            instruction: fetch.instruction,
            pc: fetch.pc,
            ty: d.ty,
            opcode: d.opcode,
            funct3: d.funct3,
            funct7: d.funct7,
            rs1: d.rs1,
            rs2: d.rs2,
            rd: d.rd,
            imm: d.imm,
            valid: true,
        }
    }
}

impl Default for DecodeUnit {
    fn default() -> Self {
        Self::new()
    }
}
