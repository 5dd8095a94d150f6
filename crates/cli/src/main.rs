//! Command-line front-end for the simulator.
//!
//! Loads a flat binary program image, runs the out-of-order core for a fixed
//! amount of model time, and prints retirement, hazard, and branch-prediction
//! statistics. A detailed report and CSV export are written on request.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use tomasim_core::config::{Config, PredictorKind};
use tomasim_core::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "tomasim",
    version,
    about = "Cycle-driven out-of-order RV32I simulator",
    long_about = "Simulates a speculative, dynamically scheduled RV32I core \
                  (Tomasulo scheduling with a reorder buffer) over a flat \
                  binary program image and reports retirement counts, cycles, \
                  hazards, and branch-prediction accuracy."
)]
struct Cli {
    /// Program binary file.
    #[arg(short = 'f', long = "file", default_value = "program.bin")]
    file: String,

    /// Simulation time in nanoseconds (10 ns per cycle at 100 MHz).
    #[arg(short = 't', long = "time", default_value_t = 1000)]
    time: u64,

    /// Branch predictor: always_not_taken, always_taken, static_btfn,
    /// one_bit, two_bit, gshare, tournament.
    #[arg(short = 'p', long = "predictor", default_value = "two_bit")]
    predictor: String,

    /// Generate a detailed performance report.
    #[arg(short = 'r', long = "report")]
    report: bool,

    /// Performance report output file.
    #[arg(short = 'o', long = "output", default_value = "performance_report.txt")]
    output: String,

    /// CSV export file.
    #[arg(short = 'c', long = "csv", default_value = "performance_data.csv")]
    csv: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = Config::default();
    config.predictor.kind = match PredictorKind::from_name(&cli.predictor) {
        Some(kind) => kind,
        None => {
            eprintln!(
                "Warning: unknown predictor type '{}'. Using default (two_bit).",
                cli.predictor
            );
            PredictorKind::TwoBit
        }
    };

    let mut sim = Simulator::new(&config);
    sim.load_program(&cli.file);

    println!("Starting simulation...");
    println!(
        "  program: {}  time: {} ns  predictor: {}",
        cli.file,
        cli.time,
        config.predictor.kind.name()
    );

    sim.run_reset();
    sim.run_for_ns(cli.time);

    println!("Simulation finished.");
    sim.processor.print_stats();

    if cli.report {
        sim.processor.analyzer.write_report(&cli.output)?;
        println!("Detailed report saved to {}", cli.output);
        sim.processor.analyzer.write_csv(&cli.csv)?;
        println!("CSV data exported to {}", cli.csv);
    }

    Ok(())
}
