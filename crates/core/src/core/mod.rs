//! Processor core.
//!
//! The orchestrator wires the stages together and advances them one discrete
//! time-step per cycle: fetch produces a packet into the fetch channel,
//! decode consumes it into the decode channel, and the execution engine runs
//! its four phases against the decode channel. Control flows backward as a
//! one-shot branch redirect (consumed by fetch the cycle after a branch
//! resolves) and a stall (asserted while issue is back-pressured, holding
//! both channels and the PC).

/// Branch prediction unit.
pub mod bru;
/// Decode stage.
pub mod decode;
/// Execution engine (issue, execute, complete, commit).
pub mod execute;
/// Fetch stage.
pub mod fetch;

use crate::common::packets::{DecodePacket, FetchPacket};
use crate::common::Address;
use crate::config::Config;
use crate::core::decode::DecodeUnit;
use crate::core::execute::ExecutionUnit;
use crate::core::fetch::FetchUnit;
use crate::mem::MemoryImage;
use crate::stats::PerformanceAnalyzer;

/// Top-level processor model.
pub struct Processor {
    /// Fetch stage (PC and branch predictor).
    pub fetch: FetchUnit,
    /// Decode stage.
    pub decode: DecodeUnit,
    /// Execution engine (reservation stations, ROB, register file).
    pub engine: ExecutionUnit,
    /// Flat memory image.
    pub mem: MemoryImage,
    /// Statistics collector.
    pub analyzer: PerformanceAnalyzer,

    /// Channel between fetch and decode; holds one packet per cycle.
    fetch_decode: FetchPacket,
    /// Channel between decode and issue; holds one packet per cycle.
    decode_exec: DecodePacket,
    /// Target of a taken branch awaiting consumption by fetch.
    pending_redirect: Option<Address>,
}

impl Processor {
    /// Creates a processor from the configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            fetch: FetchUnit::new(&config.predictor),
            decode: DecodeUnit::new(),
            engine: ExecutionUnit::new(&config.pipeline),
            mem: MemoryImage::new(config.memory.size),
            analyzer: PerformanceAnalyzer::new(),
            fetch_decode: FetchPacket::default(),
            decode_exec: DecodePacket::default(),
            pending_redirect: None,
        }
    }

    /// Advances the processor by one clock cycle.
    ///
    /// While `reset` is asserted the stages are cleared and the channels hold
    /// invalid packets; the cycle still counts.
    pub fn tick(&mut self, reset: bool) {
        self.analyzer.record_cycle();

        if reset {
            self.fetch.reset();
            self.engine.reset();
            self.fetch_decode = FetchPacket::default();
            self.decode_exec = DecodePacket::default();
            self.pending_redirect = None;
            return;
        }

        // Sample channel occupancy before the stages run: these packets spent
        // the elapsing cycle in their stages.
        if self.fetch_decode.valid {
            self.analyzer
                .record_instruction_fetch(self.fetch_decode.instruction);
        }
        if self.decode_exec.valid {
            self.analyzer
                .record_instruction_decode(self.decode_exec.instruction, self.decode_exec.ty);
        }

        // The redirect latched on an earlier cycle; a redirect produced by
        // this cycle's engine pass must not reach fetch until the next one.
        let redirect = self.pending_redirect.take();

        let outcome = self
            .engine
            .tick(&self.decode_exec, &mut self.mem, &mut self.analyzer);

        if let Some(branch) = outcome.branch {
            self.fetch.predictor.update(branch.pc, branch.branch_taken);
            if branch.branch_taken {
                self.pending_redirect = Some(branch.branch_target);
                self.analyzer.record_control_hazard();
                self.analyzer.record_pipeline_flush();
            }
        }

        if outcome.stalled {
            // Back-pressure: both channels and the PC hold. An unconsumed
            // redirect survives until fetch next runs, unless a newer branch
            // resolution replaced it above.
            if self.pending_redirect.is_none() {
                self.pending_redirect = redirect;
            }
            return;
        }

        self.decode_exec = self.decode.tick(&self.fetch_decode);
        self.fetch_decode = self.fetch.tick(redirect, &self.mem);
    }

    /// Loads a raw program image at offset 0. Execution begins at PC 0.
    pub fn load_image(&mut self, image: &[u8]) -> usize {
        self.mem.load_image(image)
    }

    /// Prints processor statistics to stdout.
    pub fn print_stats(&self) {
        println!("\n--- Processor Statistics ---");
        println!(
            "Total instructions executed: {}",
            self.analyzer.total_instructions
        );
        println!("Total cycles: {}", self.analyzer.total_cycles);
        if self.analyzer.total_cycles > 0 {
            println!("Instructions per cycle (IPC): {:.2}", self.analyzer.ipc());
        }

        let total = self.fetch.predictor.total_predictions();
        if total > 0 {
            let correct = self.fetch.predictor.correct_predictions();
            let mispredictions = total.saturating_sub(correct);
            let accuracy = self.fetch.predictor.accuracy() * 100.0;
            println!("Branch statistics:");
            println!("  Total branches: {}", total);
            println!("  Mispredictions: {}", mispredictions);
            println!("  Prediction accuracy: {:.2}%", accuracy);
        }

        self.analyzer.print_summary();
        self.analyzer.print_histogram();
    }
}
