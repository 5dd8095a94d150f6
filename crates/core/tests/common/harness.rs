//! Test harness for pipeline-level tests.
//!
//! Wraps a simulator with helpers to load an encoded program at address 0,
//! run it for a number of cycles, and inspect architectural state.

use tomasim_core::config::{Config, PredictorKind};
use tomasim_core::Simulator;

pub struct TestContext {
    pub sim: Simulator,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Default machine with the two-bit predictor.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Default machine with the given predictor.
    pub fn with_predictor(kind: PredictorKind) -> Self {
        let mut config = Config::default();
        config.predictor.kind = kind;
        Self::with_config(config)
    }

    /// Machine built from an arbitrary configuration.
    ///
    /// The reset sequence has already run; the first `run` cycle fetches
    /// from PC 0.
    pub fn with_config(config: Config) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut sim = Simulator::new(&config);
        sim.run_reset();
        Self { sim }
    }

    /// Writes a sequence of 32-bit instructions into memory at address 0.
    pub fn load_program(mut self, instructions: &[u32]) -> Self {
        for (i, inst) in instructions.iter().enumerate() {
            self.sim
                .processor
                .mem
                .write_data((i as u64) * 4, *inst as u64, 4);
        }
        self
    }

    /// Runs the simulation for the given number of cycles.
    pub fn run(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.sim.tick();
        }
    }

    /// Reads an architectural register.
    pub fn reg(&self, idx: usize) -> u64 {
        self.sim.processor.engine.regfile.read(idx)
    }

    /// Reads data memory.
    pub fn mem(&self, addr: u64, size: usize) -> u64 {
        self.sim.processor.mem.read_data(addr, size)
    }
}
