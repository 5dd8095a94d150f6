//! Performance statistics collection and reporting.
//!
//! This module tracks what the pipeline did with every cycle. It provides:
//! 1. **Pipeline occupancy:** Per-opcode and per-type cycle tallies for the
//!    fetch, decode, execute, and writeback stages.
//! 2. **Retirement counts:** Instructions committed, by opcode and by type.
//! 3. **Hazards:** Data, control, and structural hazard counts plus pipeline
//!    flushes.
//! 4. **Memory traffic:** Load and store counts.
//! 5. **Reports:** Console summary and histogram, plaintext report file, and
//!    CSV export.
//!
//! Event attribution: fetch and decode tallies are sampled once per cycle
//! from the occupied inter-stage channels; execute cycles are recorded at
//! dispatch; retirement counts and writeback cycles at commit.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use crate::common::Instruction;
use crate::isa::decode::{self, InstrType};
use crate::isa::OpcodeClass;

/// Per-opcode (or per-type) instruction statistics.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstructionStats {
    /// Instructions retired.
    pub total_count: u64,
    /// Cycles an instruction of this kind occupied the fetch channel.
    pub cycles_in_fetch: u64,
    /// Cycles an instruction of this kind occupied the decode channel.
    pub cycles_in_decode: u64,
    /// Functional-unit dispatch cycles.
    pub cycles_in_execute: u64,
    /// Commit cycles.
    pub cycles_in_writeback: u64,
}

/// Simulation statistics collector.
pub struct PerformanceAnalyzer {
    start_time: Instant,
    opcode_stats: [InstructionStats; OpcodeClass::ALL.len()],
    type_stats: [InstructionStats; InstrType::ALL.len()],

    /// Instructions retired.
    pub total_instructions: u64,
    /// Cycles simulated, including the reset cycle.
    pub total_cycles: u64,
    /// Load operations dispatched.
    pub total_memory_reads: u64,
    /// Store operations committed.
    pub total_memory_writes: u64,

    /// Issues that captured at least one pending operand tag.
    pub data_hazards: u64,
    /// Taken-branch redirects.
    pub control_hazards: u64,
    /// Cycles issue stalled on a full ROB or reservation station.
    pub structural_hazards: u64,
    /// Frontend restarts caused by taken-branch redirects.
    pub pipeline_flushes: u64,
}

impl PerformanceAnalyzer {
    /// Creates an empty collector and starts the wall-clock timer.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            opcode_stats: [InstructionStats::default(); OpcodeClass::ALL.len()],
            type_stats: [InstructionStats::default(); InstrType::ALL.len()],
            total_instructions: 0,
            total_cycles: 0,
            total_memory_reads: 0,
            total_memory_writes: 0,
            data_hazards: 0,
            control_hazards: 0,
            structural_hazards: 0,
            pipeline_flushes: 0,
        }
    }

    /// Advances the cycle counter.
    pub fn record_cycle(&mut self) {
        self.total_cycles += 1;
    }

    /// Records one cycle of fetch-channel occupancy.
    pub fn record_instruction_fetch(&mut self, inst: Instruction) {
        let class = OpcodeClass::from_inst(inst);
        let ty = decode::instruction_type(decode::opcode(inst));
        self.opcode_stats[class.index()].cycles_in_fetch += 1;
        self.type_stats[ty.index()].cycles_in_fetch += 1;
    }

    /// Records one cycle of decode-channel occupancy.
    pub fn record_instruction_decode(&mut self, inst: Instruction, ty: InstrType) {
        let class = OpcodeClass::from_inst(inst);
        self.opcode_stats[class.index()].cycles_in_decode += 1;
        self.type_stats[ty.index()].cycles_in_decode += 1;
    }

    /// Records a functional-unit dispatch.
    pub fn record_instruction_execute(&mut self, opcode: u32) {
        let class = OpcodeClass::from_opcode(opcode);
        let ty = decode::instruction_type(opcode);
        self.opcode_stats[class.index()].cycles_in_execute += 1;
        self.type_stats[ty.index()].cycles_in_execute += 1;
    }

    /// Records a retirement.
    pub fn record_instruction_commit(&mut self, opcode: u32) {
        let class = OpcodeClass::from_opcode(opcode);
        let ty = decode::instruction_type(opcode);
        self.opcode_stats[class.index()].total_count += 1;
        self.opcode_stats[class.index()].cycles_in_writeback += 1;
        self.type_stats[ty.index()].total_count += 1;
        self.type_stats[ty.index()].cycles_in_writeback += 1;
        self.total_instructions += 1;
    }

    /// Records a data-memory access.
    pub fn record_memory_access(&mut self, is_read: bool) {
        if is_read {
            self.total_memory_reads += 1;
        } else {
            self.total_memory_writes += 1;
        }
    }

    /// Records an issue that had to wait for an in-flight operand.
    pub fn record_data_hazard(&mut self) {
        self.data_hazards += 1;
    }

    /// Records a taken-branch redirect.
    pub fn record_control_hazard(&mut self) {
        self.control_hazards += 1;
    }

    /// Records an issue cycle lost to a full ROB or reservation station.
    pub fn record_structural_hazard(&mut self) {
        self.structural_hazards += 1;
    }

    /// Records a frontend restart.
    pub fn record_pipeline_flush(&mut self) {
        self.pipeline_flushes += 1;
    }

    /// Instructions per cycle over the whole run.
    pub fn ipc(&self) -> f64 {
        if self.total_cycles == 0 {
            0.0
        } else {
            self.total_instructions as f64 / self.total_cycles as f64
        }
    }

    /// Prints the overall summary to stdout.
    pub fn print_summary(&self) {
        println!("\n----- Performance Summary -----");
        println!("Total instructions executed: {}", self.total_instructions);
        println!("Total cycles: {}", self.total_cycles);
        if self.total_cycles > 0 {
            println!("Instructions per cycle (IPC): {:.2}", self.ipc());
        }

        println!("\nMemory Statistics:");
        println!("  Total memory reads: {}", self.total_memory_reads);
        println!("  Total memory writes: {}", self.total_memory_writes);

        println!("\nHazard Statistics:");
        println!("  Data hazards: {}", self.data_hazards);
        println!("  Control hazards: {}", self.control_hazards);
        println!("  Structural hazards: {}", self.structural_hazards);
        println!("  Pipeline flushes: {}", self.pipeline_flushes);

        println!("\nInstruction Mix:");
        let total = self.total_instructions.max(1) as f64;
        for ty in InstrType::ALL {
            let stats = self.type_stats[ty.index()];
            if stats.total_count > 0 {
                let percentage = stats.total_count as f64 / total * 100.0;
                println!(
                    "  {:<10}: {:>8} ({:.2}%)",
                    ty.name(),
                    stats.total_count,
                    percentage
                );
            }
        }

        let elapsed = self.start_time.elapsed();
        println!("\nSimulation time: {} ms", elapsed.as_millis());
    }

    /// Prints a `#`-bar histogram of the instruction-type mix to stdout.
    pub fn print_histogram(&self) {
        println!("\nInstruction Type Histogram");
        println!("-------------------------");

        let max_count = InstrType::ALL
            .iter()
            .map(|ty| self.type_stats[ty.index()].total_count)
            .max()
            .unwrap_or(0)
            .max(1);

        const MAX_WIDTH: usize = 50;
        let total = self.total_instructions.max(1) as f64;

        for ty in InstrType::ALL {
            let stats = self.type_stats[ty.index()];
            if stats.total_count == 0 {
                continue;
            }
            let bar = (stats.total_count as f64 / max_count as f64 * MAX_WIDTH as f64) as usize;
            let percentage = stats.total_count as f64 / total * 100.0;
            println!(
                "{:<10} [{}{}] {:>8} ({:.2}%)",
                ty.name(),
                "#".repeat(bar),
                " ".repeat(MAX_WIDTH - bar),
                stats.total_count,
                percentage
            );
        }
    }

    /// Writes the detailed plaintext report to `path`.
    pub fn write_report<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut report = File::create(path)?;
        let total = self.total_instructions.max(1) as f64;

        writeln!(report, "tomasim Detailed Performance Report")?;
        writeln!(report, "===================================")?;
        writeln!(report)?;

        writeln!(report, "Overall Statistics")?;
        writeln!(report, "-----------------")?;
        writeln!(
            report,
            "Total instructions executed: {}",
            self.total_instructions
        )?;
        writeln!(report, "Total cycles: {}", self.total_cycles)?;
        if self.total_cycles > 0 {
            writeln!(report, "Instructions per cycle (IPC): {:.2}", self.ipc())?;
        }

        writeln!(report, "\nMemory Statistics")?;
        writeln!(report, "----------------")?;
        writeln!(report, "Total memory reads: {}", self.total_memory_reads)?;
        writeln!(report, "Total memory writes: {}", self.total_memory_writes)?;

        writeln!(report, "\nHazard Statistics")?;
        writeln!(report, "----------------")?;
        writeln!(report, "Data hazards: {}", self.data_hazards)?;
        writeln!(report, "Control hazards: {}", self.control_hazards)?;
        writeln!(report, "Structural hazards: {}", self.structural_hazards)?;
        writeln!(report, "Pipeline flushes: {}", self.pipeline_flushes)?;

        writeln!(report, "\nInstruction Statistics by Opcode")?;
        writeln!(report, "-------------------------------")?;
        writeln!(
            report,
            "{:<15}{:>10}{:>10}{:>15}{:>15}{:>15}{:>17}",
            "Opcode", "Count", "%", "Fetch Cycles", "Decode Cycles", "Execute Cycles",
            "Writeback Cycles"
        )?;
        writeln!(report, "{}", "-".repeat(97))?;
        for class in OpcodeClass::ALL {
            let stats = self.opcode_stats[class.index()];
            if stats.total_count > 0 {
                let percentage = stats.total_count as f64 / total * 100.0;
                writeln!(
                    report,
                    "{:<15}{:>10}{:>10.2}{:>15}{:>15}{:>15}{:>17}",
                    class.name(),
                    stats.total_count,
                    percentage,
                    stats.cycles_in_fetch,
                    stats.cycles_in_decode,
                    stats.cycles_in_execute,
                    stats.cycles_in_writeback
                )?;
            }
        }

        writeln!(report, "\nInstruction Statistics by Type")?;
        writeln!(report, "----------------------------")?;
        writeln!(
            report,
            "{:<15}{:>10}{:>10}{:>15}{:>15}{:>15}{:>17}",
            "Type", "Count", "%", "Fetch Cycles", "Decode Cycles", "Execute Cycles",
            "Writeback Cycles"
        )?;
        writeln!(report, "{}", "-".repeat(97))?;
        for ty in InstrType::ALL {
            let stats = self.type_stats[ty.index()];
            if stats.total_count > 0 {
                let percentage = stats.total_count as f64 / total * 100.0;
                writeln!(
                    report,
                    "{:<15}{:>10}{:>10.2}{:>15}{:>15}{:>15}{:>17}",
                    ty.name(),
                    stats.total_count,
                    percentage,
                    stats.cycles_in_fetch,
                    stats.cycles_in_decode,
                    stats.cycles_in_execute,
                    stats.cycles_in_writeback
                )?;
            }
        }

        Ok(())
    }

    /// Writes the CSV export to `path`.
    ///
    /// Columns: `Category,Type,Count,Percentage,FetchCycles,DecodeCycles,
    /// ExecuteCycles,WritebackCycles`. Hazard and overall rows carry only a
    /// count and leave the trailing fields empty.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut csv = File::create(path)?;
        let total = self.total_instructions.max(1) as f64;

        writeln!(
            csv,
            "Category,Type,Count,Percentage,FetchCycles,DecodeCycles,ExecuteCycles,WritebackCycles"
        )?;

        for class in OpcodeClass::ALL {
            let stats = self.opcode_stats[class.index()];
            if stats.total_count > 0 {
                writeln!(
                    csv,
                    "Opcode,{},{},{:.2},{},{},{},{}",
                    class.name(),
                    stats.total_count,
                    stats.total_count as f64 / total * 100.0,
                    stats.cycles_in_fetch,
                    stats.cycles_in_decode,
                    stats.cycles_in_execute,
                    stats.cycles_in_writeback
                )?;
            }
        }

        for ty in InstrType::ALL {
            let stats = self.type_stats[ty.index()];
            if stats.total_count > 0 {
                writeln!(
                    csv,
                    "Type,{},{},{:.2},{},{},{},{}",
                    ty.name(),
                    stats.total_count,
                    stats.total_count as f64 / total * 100.0,
                    stats.cycles_in_fetch,
                    stats.cycles_in_decode,
                    stats.cycles_in_execute,
                    stats.cycles_in_writeback
                )?;
            }
        }

        writeln!(csv, "Hazard,Data,{},,,,,", self.data_hazards)?;
        writeln!(csv, "Hazard,Control,{},,,,,", self.control_hazards)?;
        writeln!(csv, "Hazard,Structural,{},,,,,", self.structural_hazards)?;
        writeln!(csv, "Hazard,PipelineFlush,{},,,,,", self.pipeline_flushes)?;

        writeln!(csv, "Overall,Instructions,{},,,,,", self.total_instructions)?;
        writeln!(csv, "Overall,Cycles,{},,,,,", self.total_cycles)?;
        if self.total_cycles > 0 {
            writeln!(csv, "Overall,IPC,{:.4},,,,,", self.ipc())?;
        }
        writeln!(csv, "Memory,Reads,{},,,,,", self.total_memory_reads)?;
        writeln!(csv, "Memory,Writes,{},,,,,", self.total_memory_writes)?;

        Ok(())
    }
}

impl Default for PerformanceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
