//! Simulator: owns the processor and the clock/reset protocol.
//!
//! The model clock runs at 100 MHz (10 ns period). Reset is asserted for the
//! first 10 ns of a run and deasserted afterwards; simulation time converts
//! to cycles by integer division with the clock period.

use crate::config::Config;
use crate::core::Processor;
use crate::sim::loader;

/// Top-level simulation driver.
pub struct Simulator {
    /// The processor under simulation.
    pub processor: Processor,
    period_ns: u64,
    reset_ns: u64,
}

impl Simulator {
    /// Creates a simulator with the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            processor: Processor::new(config),
            period_ns: config.clock.period_ns.max(1),
            reset_ns: config.clock.reset_ns,
        }
    }

    /// Loads a program file into memory. Returns the number of bytes loaded.
    pub fn load_program(&mut self, path: &str) -> usize {
        loader::load_program(&mut self.processor.mem, path)
    }

    /// Runs the reset sequence: reset asserted for the configured duration.
    pub fn run_reset(&mut self) {
        for _ in 0..self.cycles_for(self.reset_ns) {
            self.processor.tick(true);
        }
    }

    /// Runs the simulation for `time_ns` nanoseconds of model time.
    pub fn run_for_ns(&mut self, time_ns: u64) {
        for _ in 0..self.cycles_for(time_ns) {
            self.processor.tick(false);
        }
    }

    /// Advances one cycle with reset deasserted.
    pub fn tick(&mut self) {
        self.processor.tick(false);
    }

    /// Converts nanoseconds of model time to whole clock cycles.
    fn cycles_for(&self, time_ns: u64) -> u64 {
        time_ns / self.period_ns
    }
}
