//! Decoder/encoder round-trip tests.
//!
//! Builds instruction encodings with the test builder and verifies the
//! decoder reproduces the fields, covering every instruction format and the
//! immediate sign-extension rules.

use crate::common::builder::InstructionBuilder;
use tomasim_core::isa::decode::{self, InstrType};
use tomasim_core::isa::opcodes;

// ══════════════════════════════════════════════════════════
// Field round-trips per format
// ══════════════════════════════════════════════════════════

#[test]
fn r_type_round_trip() {
    let inst = InstructionBuilder::new().add(3, 1, 2).build();
    let d = decode::decode(inst);

    assert_eq!(d.ty, InstrType::R);
    assert_eq!(d.opcode, opcodes::OP_REG);
    assert_eq!(d.rd, 3);
    assert_eq!(d.rs1, 1);
    assert_eq!(d.rs2, 2);
    assert_eq!(d.funct3, 0b000);
    assert_eq!(d.funct7, 0);
    assert_eq!(d.imm, 0);
}

#[test]
fn r_type_sub_carries_funct7() {
    let inst = InstructionBuilder::new().sub(3, 1, 2).build();
    let d = decode::decode(inst);
    assert_eq!(d.funct7, 0b0100000);
}

#[test]
fn i_type_round_trip_with_negative_imm() {
    let inst = InstructionBuilder::new().addi(5, 7, -273).build();
    let d = decode::decode(inst);

    assert_eq!(d.ty, InstrType::I);
    assert_eq!(d.rd, 5);
    assert_eq!(d.rs1, 7);
    assert_eq!(d.imm, -273);
}

#[test]
fn i_type_imm_boundaries() {
    let max = InstructionBuilder::new().addi(1, 0, 2047).build();
    assert_eq!(decode::decode(max).imm, 2047);

    let min = InstructionBuilder::new().addi(1, 0, -2048).build();
    assert_eq!(decode::decode(min).imm, -2048);
}

#[test]
fn s_type_round_trip() {
    let inst = InstructionBuilder::new().sw(2, 9, -4).build();
    let d = decode::decode(inst);

    assert_eq!(d.ty, InstrType::S);
    assert_eq!(d.rs1, 2);
    assert_eq!(d.rs2, 9);
    assert_eq!(d.imm, -4);
}

#[test]
fn b_type_round_trip() {
    // Branch offsets are even; bit 0 is not encoded.
    for offset in [-4096, -8, -2, 2, 8, 4094] {
        let inst = InstructionBuilder::new().beq(1, 2, offset).build();
        let d = decode::decode(inst);
        assert_eq!(d.ty, InstrType::B);
        assert_eq!(d.imm, offset, "offset {} did not round-trip", offset);
    }
}

#[test]
fn u_type_round_trip() {
    let inst = InstructionBuilder::new().lui(4, 0x12345).build();
    let d = decode::decode(inst);

    assert_eq!(d.ty, InstrType::U);
    assert_eq!(d.rd, 4);
    assert_eq!(d.imm, 0x12345 << 12);
}

#[test]
fn u_type_sign_bit() {
    let inst = InstructionBuilder::new().lui(4, 0xFFFFF).build();
    let d = decode::decode(inst);
    assert_eq!(d.imm, (0xFFFFFu32 << 12) as i32);
    assert!(d.imm < 0);
}

#[test]
fn j_type_round_trip() {
    for offset in [-1048576, -2048, -2, 2, 8, 2048, 1048574] {
        let inst = InstructionBuilder::new().jal(1, offset).build();
        let d = decode::decode(inst);
        assert_eq!(d.ty, InstrType::J);
        assert_eq!(d.imm, offset, "offset {} did not round-trip", offset);
    }
}

// ══════════════════════════════════════════════════════════
// Type derivation
// ══════════════════════════════════════════════════════════

#[test]
fn type_derivation_per_opcode() {
    assert_eq!(decode::instruction_type(opcodes::OP_REG), InstrType::R);
    assert_eq!(decode::instruction_type(opcodes::OP_IMM), InstrType::I);
    assert_eq!(decode::instruction_type(opcodes::OP_LOAD), InstrType::I);
    assert_eq!(decode::instruction_type(opcodes::OP_JALR), InstrType::I);
    assert_eq!(decode::instruction_type(opcodes::OP_STORE), InstrType::S);
    assert_eq!(decode::instruction_type(opcodes::OP_BRANCH), InstrType::B);
    assert_eq!(decode::instruction_type(opcodes::OP_LUI), InstrType::U);
    assert_eq!(decode::instruction_type(opcodes::OP_AUIPC), InstrType::U);
    assert_eq!(decode::instruction_type(opcodes::OP_JAL), InstrType::J);
    assert_eq!(
        decode::instruction_type(opcodes::OP_SYSTEM),
        InstrType::Unknown
    );
    assert_eq!(decode::instruction_type(0b1111111), InstrType::Unknown);
}

#[test]
fn raw_field_setters_match_helpers() {
    let via_setters = InstructionBuilder::new()
        .opcode(opcodes::OP_IMM)
        .rd(4)
        .rs1(2)
        .funct3(0b000)
        .imm(33)
        .build();
    let via_helper = InstructionBuilder::new().addi(4, 2, 33).build();
    assert_eq!(via_setters, via_helper);

    let sub_raw = InstructionBuilder::new()
        .opcode(opcodes::OP_REG)
        .rd(1)
        .rs1(2)
        .rs2(3)
        .funct3(0b000)
        .funct7(0b0100000)
        .build();
    assert_eq!(sub_raw, InstructionBuilder::new().sub(1, 2, 3).build());
}

#[test]
fn auipc_round_trip() {
    let inst = InstructionBuilder::new().auipc(7, 0x00ABC).build();
    let d = decode::decode(inst);
    assert_eq!(d.ty, InstrType::U);
    assert_eq!(d.rd, 7);
    assert_eq!(d.imm, 0x00ABC << 12);
    assert_eq!(d.opcode, opcodes::OP_AUIPC);
}

#[test]
fn unknown_opcode_decodes_with_zero_imm() {
    let d = decode::decode(0b1111111 | (5 << 7));
    assert_eq!(d.ty, InstrType::Unknown);
    assert_eq!(d.rd, 5);
    assert_eq!(d.imm, 0);
}
