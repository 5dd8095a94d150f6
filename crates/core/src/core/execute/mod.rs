//! Execution engine: issue, execute, complete, commit.
//!
//! The backend of the pipeline. The four phases are conceptually parallel
//! hardware; the engine serializes them in reverse pipeline order within a
//! tick (commit, execute, complete, issue) so each phase observes its
//! upstream phase's previous-cycle output. An instruction issued this cycle
//! dispatches no earlier than the next one, and a result completed this cycle
//! commits no earlier than the next one.
//! 1. **Commit:** Retires completed entries from the ROB head in program
//!    order, applying register writes and deferred stores.
//! 2. **Execute:** Dispatches every ready reservation-station entry to its
//!    single-cycle functional unit and marks the ROB entry completed.
//! 3. **Complete:** Broadcasts the newly completed results over the common
//!    data bus so waiting entries capture their operand values before the
//!    producing slot can be freed.
//! 4. **Issue:** Renames one decoded instruction into a ROB slot and a typed
//!    reservation station, capturing operands or producer tags.
//!
//! Back-pressure (a full ROB or pool) stalls issue without dropping the
//! decoded instruction. Branch outcomes are surfaced on the engine output so
//! the orchestrator can train the predictor and redirect fetch; in-flight
//! younger instructions are not squashed.

/// Reorder buffer (ring, one-shot completion flags).
pub mod rob;

/// Architectural register file.
pub mod regfile;

/// Reservation-station pools.
pub mod station;

use crate::common::packets::{DecodePacket, ExecutePacket};
use crate::common::RegisterValue;
use crate::config::PipelineConfig;
use crate::isa::decode::InstrType;
use crate::isa::{funct3, opcodes};
use crate::mem::MemoryImage;
use crate::stats::PerformanceAnalyzer;

use self::regfile::{RegisterFile, NUM_REGISTERS};
use self::rob::{ReorderBuffer, RobEntry, RobTag};
use self::station::{ReservationStation, RsEntry};

/// Outcome of one engine cycle, consumed by the orchestrator.
#[derive(Clone, Copy, Debug, Default)]
pub struct EngineTick {
    /// Whether the decode-channel packet was accepted into the backend.
    pub consumed: bool,
    /// Whether issue stalled on a full ROB or reservation station.
    pub stalled: bool,
    /// The last branch resolved this cycle, if any.
    pub branch: Option<ExecutePacket>,
}

/// The execution engine.
pub struct ExecutionUnit {
    /// Reservation stations for ALU operations.
    pub rs_alu: ReservationStation,
    /// Reservation stations for loads and stores.
    pub rs_mem: ReservationStation,
    /// Reservation stations for branches and jumps.
    pub rs_branch: ReservationStation,
    /// Reorder buffer.
    pub rob: ReorderBuffer,
    /// Architectural register file.
    pub regfile: RegisterFile,
    /// Latest in-flight ROB writer per architectural register.
    pub reg_status: [Option<usize>; NUM_REGISTERS],
}

impl ExecutionUnit {
    /// Creates an engine with the configured capacities.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            rs_alu: ReservationStation::new(config.rs_alu_entries),
            rs_mem: ReservationStation::new(config.rs_mem_entries),
            rs_branch: ReservationStation::new(config.rs_branch_entries),
            rob: ReorderBuffer::new(config.rob_entries),
            regfile: RegisterFile::new(),
            reg_status: [None; NUM_REGISTERS],
        }
    }

    /// Clears all backend state.
    pub fn reset(&mut self) {
        self.rs_alu.reset();
        self.rs_mem.reset();
        self.rs_branch.reset();
        self.rob.reset();
        self.regfile.reset();
        self.reg_status = [None; NUM_REGISTERS];
    }

    /// Runs one engine cycle (phases in reverse pipeline order).
    pub fn tick(
        &mut self,
        decode_in: &DecodePacket,
        mem: &mut MemoryImage,
        analyzer: &mut PerformanceAnalyzer,
    ) -> EngineTick {
        self.commit(mem, analyzer);
        let branch = self.execute(mem, analyzer);
        self.complete();
        let (consumed, stalled) = self.issue(decode_in, analyzer);

        EngineTick {
            consumed,
            stalled,
            branch,
        }
    }

    /// Issue phase: accept at most one decoded instruction per cycle.
    ///
    /// Returns `(consumed, stalled)`. A stall leaves the packet in the decode
    /// channel for the next cycle.
    fn issue(&mut self, packet: &DecodePacket, analyzer: &mut PerformanceAnalyzer) -> (bool, bool) {
        if !packet.valid {
            return (false, false);
        }

        if self.rob.is_full() {
            analyzer.record_structural_hazard();
            return (false, true);
        }

        let rs = match packet.opcode {
            opcodes::OP_LOAD | opcodes::OP_STORE => &mut self.rs_mem,
            opcodes::OP_BRANCH | opcodes::OP_JAL | opcodes::OP_JALR => &mut self.rs_branch,
            _ => &mut self.rs_alu,
        };
        if rs.is_full() {
            analyzer.record_structural_hazard();
            return (false, true);
        }

        let rob_index = match self.rob.allocate_entry() {
            Some(index) => index,
            None => {
                analyzer.record_structural_hazard();
                return (false, true);
            }
        };

        self.rob.update_entry(
            rob_index,
            RobEntry {
                busy: true,
                dest: packet.rd,
                is_store: packet.opcode == opcodes::OP_STORE,
                pc: packet.pc,
                funct3: packet.funct3,
                opcode: packet.opcode,
                ..Default::default()
            },
        );

        let mut entry = RsEntry {
            opcode: packet.opcode,
            funct3: packet.funct3,
            funct7: packet.funct7,
            rd: packet.rd,
            imm: packet.imm,
            pc: packet.pc,
            ..Default::default()
        };

        // Operand capture. rs1 is read by every format except U and J; rs2
        // only by R, S, and B.
        let uses_rs1 = !matches!(packet.ty, InstrType::U | InstrType::J);
        let uses_rs2 = matches!(packet.ty, InstrType::R | InstrType::S | InstrType::B);

        let mut waited = false;
        let (vj, qj) = self.capture_operand(packet.rs1, uses_rs1, &mut waited);
        let (vk, qk) = self.capture_operand(packet.rs2, uses_rs2, &mut waited);
        entry.vj = vj;
        entry.qj = qj;
        entry.vk = vk;
        entry.qk = qk;
        if waited {
            analyzer.record_data_hazard();
        }

        let rs = match packet.opcode {
            opcodes::OP_LOAD | opcodes::OP_STORE => &mut self.rs_mem,
            opcodes::OP_BRANCH | opcodes::OP_JAL | opcodes::OP_JALR => &mut self.rs_branch,
            _ => &mut self.rs_alu,
        };
        rs.add_entry(entry, rob_index);

        // Rename the destination. Stores and conditional branches write no
        // register; JAL/JALR do (the link register).
        if packet.rd != 0
            && packet.opcode != opcodes::OP_STORE
            && packet.opcode != opcodes::OP_BRANCH
        {
            self.reg_status[packet.rd] = Some(rob_index);
        }

        (true, false)
    }

    /// Resolves one source operand to a value or a producer tag.
    ///
    /// `x0` and unused operands capture zero. A busy register whose producer
    /// has already completed captures the value straight from the ROB;
    /// otherwise the entry waits on the producer's tag.
    fn capture_operand(
        &self,
        reg: usize,
        used: bool,
        waited: &mut bool,
    ) -> (RegisterValue, Option<RobTag>) {
        if !used || reg == 0 {
            return (0, None);
        }

        match self.reg_status[reg] {
            Some(producer) => {
                if self.rob.is_entry_completed(producer) {
                    (self.rob.entry_value(producer), None)
                } else {
                    *waited = true;
                    (0, Some(RobTag(producer)))
                }
            }
            None => (self.regfile.read(reg), None),
        }
    }

    /// Execute phase: dispatch every ready entry in every pool.
    ///
    /// Returns the last branch resolved this cycle so the orchestrator can
    /// train the predictor and redirect fetch.
    fn execute(
        &mut self,
        mem: &mut MemoryImage,
        analyzer: &mut PerformanceAnalyzer,
    ) -> Option<ExecutePacket> {
        for (entry, rob_index) in self.rs_alu.ready_entries() {
            let result = alu_result(&entry);
            self.rob.complete_entry(rob_index, result);
            self.rs_alu.remove_entry(rob_index);
            analyzer.record_instruction_execute(entry.opcode);
        }

        for (entry, rob_index) in self.rs_mem.ready_entries() {
            let packet = mem_op(&entry, mem);
            if entry.opcode == opcodes::OP_LOAD {
                self.rob.complete_entry(rob_index, packet.result);
                analyzer.record_memory_access(true);
            } else {
                // The store's memory write is deferred to commit.
                self.rob
                    .update_store_entry(rob_index, packet.mem_addr, packet.mem_data);
            }
            self.rs_mem.remove_entry(rob_index);
            analyzer.record_instruction_execute(entry.opcode);
        }

        let mut branch_out = None;
        for (entry, rob_index) in self.rs_branch.ready_entries() {
            let packet = branch_op(&entry);
            self.rob.complete_branch_entry(
                rob_index,
                packet.result,
                packet.branch_taken,
                packet.branch_target,
            );
            self.rs_branch.remove_entry(rob_index);
            analyzer.record_instruction_execute(entry.opcode);
            branch_out = Some(packet);
        }
        branch_out
    }

    /// Complete phase: broadcast newly completed results to waiting entries.
    fn complete(&mut self) {
        for (rob_index, value) in self.rob.take_newly_completed() {
            let tag = RobTag(rob_index);
            self.rs_alu.update_waiting_entries(tag, value);
            self.rs_mem.update_waiting_entries(tag, value);
            self.rs_branch.update_waiting_entries(tag, value);
        }
    }

    /// Commit phase: retire completed head entries in program order.
    ///
    /// Commits as many instructions as the head allows in one cycle.
    fn commit(&mut self, mem: &mut MemoryImage, analyzer: &mut PerformanceAnalyzer) {
        while self.rob.is_head_completed() {
            let head_index = self.rob.head_index();
            let entry = match self.rob.head_entry() {
                Some(entry) => entry.clone(),
                None => break,
            };

            if entry.is_store {
                let size = match entry.funct3 {
                    funct3::SB => 1,
                    funct3::SH => 2,
                    _ => 4,
                };
                mem.write_data(entry.mem_addr, entry.mem_data, size);
                analyzer.record_memory_access(false);
            } else if entry.dest != 0 {
                self.regfile.write(entry.dest, entry.value);
                // Only the latest in-flight writer releases the rename; a
                // younger producer keeps the register busy.
                if self.reg_status[entry.dest] == Some(head_index) {
                    self.reg_status[entry.dest] = None;
                }
            }

            analyzer.record_instruction_commit(entry.opcode);
            self.rob.remove_head();
        }
    }
}

/// Computes the result of an ALU operation (LUI, AUIPC, OP, OP-IMM).
///
/// Unknown opcodes and function codes produce zero.
fn alu_result(entry: &RsEntry) -> RegisterValue {
    let op1 = entry.vj;
    let op2 = if entry.opcode == opcodes::OP_IMM {
        entry.imm as i64 as u64
    } else {
        entry.vk
    };

    match entry.opcode {
        opcodes::OP_LUI => entry.imm as i64 as u64,
        opcodes::OP_AUIPC => entry.pc.wrapping_add(entry.imm as i64 as u64),
        opcodes::OP_REG | opcodes::OP_IMM => match entry.funct3 {
            funct3::ADD_SUB => {
                if entry.opcode == opcodes::OP_REG && entry.funct7 & 0x20 != 0 {
                    op1.wrapping_sub(op2)
                } else {
                    op1.wrapping_add(op2)
                }
            }
            funct3::SLT => ((op1 as i64) < (op2 as i64)) as u64,
            funct3::SLTU => (op1 < op2) as u64,
            funct3::XOR => op1 ^ op2,
            funct3::OR => op1 | op2,
            funct3::AND => op1 & op2,
            funct3::SLL => op1.wrapping_shl((op2 & 0x3F) as u32),
            funct3::SRL_SRA => {
                let shamt = (op2 & 0x3F) as u32;
                if entry.opcode == opcodes::OP_REG && entry.funct7 & 0x20 != 0 {
                    ((op1 as i64).wrapping_shr(shamt)) as u64
                } else {
                    op1.wrapping_shr(shamt)
                }
            }
            _ => 0,
        },
        _ => 0,
    }
}

/// Executes a memory operation.
///
/// Loads read memory immediately and sign-extend per LB/LH/LW (the unsigned
/// variants stay zero-extended). Stores only record their address and data;
/// the write happens at commit.
fn mem_op(entry: &RsEntry, mem: &MemoryImage) -> ExecutePacket {
    let addr = entry.vj.wrapping_add(entry.imm as i64 as u64);
    let mut packet = ExecutePacket {
        pc: entry.pc,
        rd: entry.rd,
        mem_access: true,
        mem_write: entry.opcode == opcodes::OP_STORE,
        mem_addr: addr,
        valid: true,
        ..Default::default()
    };

    if entry.opcode == opcodes::OP_LOAD {
        let size = match entry.funct3 {
            funct3::LB | funct3::LBU => 1,
            funct3::LH | funct3::LHU => 2,
            _ => 4,
        };
        let data = mem.read_data(addr, size);
        packet.result = match entry.funct3 {
            funct3::LB => data as u8 as i8 as i64 as u64,
            funct3::LH => data as u16 as i16 as i64 as u64,
            funct3::LW => data as u32 as i32 as i64 as u64,
            _ => data,
        };
    } else {
        packet.mem_data = entry.vk;
    }
    packet
}

/// Resolves a branch or jump.
///
/// JAL and JALR produce the link address and are always taken; conditional
/// branches compare per funct3 and target `pc + imm` when taken.
fn branch_op(entry: &RsEntry) -> ExecutePacket {
    let mut packet = ExecutePacket {
        pc: entry.pc,
        rd: entry.rd,
        branch_target: entry.pc.wrapping_add(4),
        valid: true,
        ..Default::default()
    };

    match entry.opcode {
        opcodes::OP_JAL => {
            packet.result = entry.pc.wrapping_add(4);
            packet.branch_taken = true;
            packet.branch_target = entry.pc.wrapping_add(entry.imm as i64 as u64);
        }
        opcodes::OP_JALR => {
            packet.result = entry.pc.wrapping_add(4);
            packet.branch_taken = true;
            packet.branch_target = entry.vj.wrapping_add(entry.imm as i64 as u64) & !1;
        }
        opcodes::OP_BRANCH => {
            packet.branch_taken = match entry.funct3 {
                funct3::BEQ => entry.vj == entry.vk,
                funct3::BNE => entry.vj != entry.vk,
                funct3::BLT => (entry.vj as i64) < (entry.vk as i64),
                funct3::BGE => (entry.vj as i64) >= (entry.vk as i64),
                funct3::BLTU => entry.vj < entry.vk,
                funct3::BGEU => entry.vj >= entry.vk,
                _ => false,
            };
            if packet.branch_taken {
                packet.branch_target = entry.pc.wrapping_add(entry.imm as i64 as u64);
            }
        }
        _ => {}
    }
    packet
}
