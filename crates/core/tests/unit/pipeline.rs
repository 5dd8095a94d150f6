//! End-to-end pipeline scenario tests.
//!
//! Each test loads a short encoded program at address 0, runs the simulator
//! for enough cycles, and checks architectural state. The model does not
//! squash wrong-path instructions after a branch resolves, so control-flow
//! tests use the not-taken-speculating predictor, where every redirect
//! corresponds to exactly one re-steer of fetch.

use crate::common::builder::InstructionBuilder;
use crate::common::harness::TestContext;
use tomasim_core::config::{Config, PredictorKind};

// ══════════════════════════════════════════════════════════
// 1. ALU data flow
// ══════════════════════════════════════════════════════════

#[test]
fn add_chain_produces_sum() {
    let mut tc = TestContext::new().load_program(&[
        InstructionBuilder::new().addi(1, 0, 7).build(),
        InstructionBuilder::new().addi(2, 0, 5).build(),
        InstructionBuilder::new().add(3, 1, 2).build(),
    ]);
    tc.run(30);

    assert_eq!(tc.reg(1), 7);
    assert_eq!(tc.reg(2), 5);
    assert_eq!(tc.reg(3), 12);
}

#[test]
fn sub_and_logic_ops() {
    let mut tc = TestContext::new().load_program(&[
        InstructionBuilder::new().addi(1, 0, 12).build(),
        InstructionBuilder::new().addi(2, 0, 10).build(),
        InstructionBuilder::new().sub(3, 1, 2).build(),
        InstructionBuilder::new()
            .opcode(tomasim_core::isa::opcodes::OP_REG)
            .rd(4)
            .rs1(1)
            .rs2(2)
            .funct3(0b111)
            .build(), // and x4, x1, x2
    ]);
    tc.run(30);

    assert_eq!(tc.reg(3), 2);
    assert_eq!(tc.reg(4), 12 & 10);
}

#[test]
fn writes_to_x0_are_ignored() {
    let mut tc = TestContext::new().load_program(&[
        InstructionBuilder::new().addi(0, 0, 5).build(),
        InstructionBuilder::new().addi(1, 0, 3).build(),
    ]);
    tc.run(30);

    assert_eq!(tc.reg(0), 0);
    assert_eq!(tc.reg(1), 3);
}

#[test]
fn shift_amount_uses_low_six_bits() {
    let mut tc = TestContext::new().load_program(&[
        InstructionBuilder::new().addi(1, 0, 1).build(),
        InstructionBuilder::new().addi(2, 0, 0x41).build(), // 65: effective shift 1
        InstructionBuilder::new().sll(3, 1, 2).build(),
    ]);
    tc.run(30);

    assert_eq!(tc.reg(3), 2);
}

#[test]
fn sra_propagates_sign_srl_does_not() {
    let mut tc = TestContext::new().load_program(&[
        InstructionBuilder::new().addi(1, 0, -8).build(),
        InstructionBuilder::new().addi(2, 0, 1).build(),
        InstructionBuilder::new().sra(3, 1, 2).build(),
        InstructionBuilder::new().srl(4, 1, 2).build(),
    ]);
    tc.run(30);

    assert_eq!(tc.reg(3), -4i64 as u64);
    assert_eq!(tc.reg(4), (-8i64 as u64) >> 1);
}

// ══════════════════════════════════════════════════════════
// 2. Memory
// ══════════════════════════════════════════════════════════

#[test]
fn store_then_load_sign_extends() {
    // Build 0xDEADBEEF in x6, store it at 0x100, load it back into x4.
    let mut tc = TestContext::new().load_program(&[
        InstructionBuilder::new().lui(6, 0xDEADC).build(),
        InstructionBuilder::new().addi(6, 6, -273).build(), // 0xDEADC000 - 0x111
        InstructionBuilder::new().sw(0, 6, 0x100).build(),
        InstructionBuilder::new().lw(4, 0, 0x100).build(),
    ]);
    tc.run(40);

    assert_eq!(tc.mem(0x100, 4), 0xDEAD_BEEF);
    assert_eq!(tc.reg(4), 0xFFFF_FFFF_DEAD_BEEF);
}

#[test]
fn store_byte_then_load_byte_unsigned() {
    let mut tc = TestContext::new().load_program(&[
        InstructionBuilder::new().sb(0, 0, 0x80).build(),
        InstructionBuilder::new().lbu(5, 0, 0x80).build(),
    ]);
    tc.run(30);

    assert_eq!(tc.reg(5), 0);
}

#[test]
fn committed_store_is_visible_in_memory() {
    let mut tc = TestContext::new().load_program(&[
        InstructionBuilder::new().addi(1, 0, 0x7F).build(),
        InstructionBuilder::new().sb(0, 1, 0x40).build(),
    ]);
    tc.run(30);

    assert_eq!(tc.mem(0x40, 1), 0x7F);
}

// ══════════════════════════════════════════════════════════
// 3. Control flow
// ══════════════════════════════════════════════════════════

#[test]
fn backward_branch_loop_counts_down() {
    // addi x1, x0, 3; L: addi x1, x1, -1; bne x1, x0, L
    let mut tc =
        TestContext::with_predictor(PredictorKind::AlwaysNotTaken).load_program(&[
            InstructionBuilder::new().addi(1, 0, 3).build(),
            InstructionBuilder::new().addi(1, 1, -1).build(),
            InstructionBuilder::new().bne(1, 0, -4).build(),
        ]);
    tc.run(120);

    assert_eq!(tc.reg(1), 0);
    // The loop back-edge resolved taken at least twice.
    assert!(tc.sim.processor.analyzer.control_hazards >= 2);
}

#[test]
fn jal_links_and_redirects() {
    // jal x1, +8 skips the word at pc 4; execution resumes at pc 8.
    let mut tc = TestContext::with_predictor(PredictorKind::AlwaysNotTaken).load_program(&[
        InstructionBuilder::new().jal(1, 8).build(),
        0,
        InstructionBuilder::new().addi(2, 0, 9).build(),
    ]);
    tc.run(30);

    assert_eq!(tc.reg(1), 4);
    assert_eq!(tc.reg(2), 9);
}

#[test]
fn jalr_clears_target_low_bit() {
    // x1 = 9; jalr x2, 0(x1) lands on 8 (low bit cleared), where x3 is set.
    let mut tc = TestContext::with_predictor(PredictorKind::AlwaysNotTaken).load_program(&[
        InstructionBuilder::new().addi(1, 0, 9).build(),
        InstructionBuilder::new().jalr(2, 1, 0).build(),
        InstructionBuilder::new().addi(3, 0, 5).build(),
    ]);
    tc.run(30);

    assert_eq!(tc.reg(2), 8); // link address of the jalr at pc 4
    assert_eq!(tc.reg(3), 5);
}

#[test]
fn taken_branch_skips_architectural_effect_eventually() {
    // beq x0, x0, +8 jumps over nothing harmful; target sets x4.
    let mut tc = TestContext::with_predictor(PredictorKind::AlwaysNotTaken).load_program(&[
        InstructionBuilder::new().beq(0, 0, 8).build(),
        0,
        InstructionBuilder::new().addi(4, 0, 1).build(),
    ]);
    tc.run(30);

    assert_eq!(tc.reg(4), 1);
    assert!(tc.sim.processor.analyzer.control_hazards >= 1);
}

// ══════════════════════════════════════════════════════════
// 4. Unknown opcodes and back-pressure
// ══════════════════════════════════════════════════════════

#[test]
fn unknown_opcode_commits_zero_without_stalling() {
    // An all-ones opcode with rd = 5 flows through and writes zero.
    let unknown = 0b1111111 | (5 << 7);
    let mut tc = TestContext::new().load_program(&[
        InstructionBuilder::new().addi(5, 0, 7).build(),
        unknown,
        InstructionBuilder::new().addi(6, 0, 9).build(),
    ]);
    tc.run(30);

    assert_eq!(tc.reg(5), 0, "unknown opcode writes zero to its rd");
    assert_eq!(tc.reg(6), 9, "pipeline continues past the unknown opcode");
}

#[test]
fn issue_stalls_on_full_rob_without_dropping() {
    let mut config = Config::default();
    config.pipeline.rob_entries = 1;
    let mut tc = TestContext::with_config(config).load_program(&[
        InstructionBuilder::new().addi(1, 0, 1).build(),
        InstructionBuilder::new().addi(2, 0, 2).build(),
        InstructionBuilder::new().addi(3, 0, 3).build(),
    ]);
    tc.run(60);

    assert_eq!(tc.reg(1), 1);
    assert_eq!(tc.reg(2), 2);
    assert_eq!(tc.reg(3), 3);
    assert!(tc.sim.processor.analyzer.structural_hazards > 0);
}

// ══════════════════════════════════════════════════════════
// 5. Statistics plumbing
// ══════════════════════════════════════════════════════════

#[test]
fn retirement_and_cycle_counters_advance() {
    let mut tc = TestContext::new().load_program(&[
        InstructionBuilder::new().addi(1, 0, 1).build(),
        InstructionBuilder::new().addi(2, 0, 2).build(),
    ]);
    tc.run(25);

    let analyzer = &tc.sim.processor.analyzer;
    // 25 run cycles plus the reset cycle.
    assert_eq!(analyzer.total_cycles, 26);
    assert!(analyzer.total_instructions >= 2);
}

#[test]
fn memory_traffic_is_counted() {
    let mut tc = TestContext::new().load_program(&[
        InstructionBuilder::new().addi(1, 0, 42).build(),
        InstructionBuilder::new().sw(0, 1, 0x200).build(),
        InstructionBuilder::new().lw(2, 0, 0x200).build(),
    ]);
    tc.run(40);

    let analyzer = &tc.sim.processor.analyzer;
    assert!(analyzer.total_memory_reads >= 1);
    assert!(analyzer.total_memory_writes >= 1);
    assert_eq!(tc.reg(2), 42);
}
