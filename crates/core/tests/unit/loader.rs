//! Program image loading tests.

use std::io::Write;
use tempfile::NamedTempFile;

use tomasim_core::config::Config;
use tomasim_core::mem::MemoryImage;
use tomasim_core::sim::loader;
use tomasim_core::Simulator;

/// Creates a temporary binary file with the given contents.
fn temp_binary(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn load_binary_reads_file_contents() {
    let data = vec![0x13, 0x00, 0x00, 0x00]; // addi x0, x0, 0
    let file = temp_binary(&data);

    let loaded = loader::load_binary(file.path().to_str().unwrap()).unwrap();
    assert_eq!(loaded, data);
}

#[test]
fn load_program_places_bytes_at_offset_zero() {
    let data = vec![0xEF, 0xBE, 0xAD, 0xDE];
    let file = temp_binary(&data);

    let mut mem = MemoryImage::new(64);
    let n = loader::load_program(&mut mem, file.path().to_str().unwrap());
    assert_eq!(n, 4);
    assert_eq!(mem.read_data(0, 4), 0xDEAD_BEEF);
}

#[test]
fn load_program_truncates_to_image_size() {
    let data: Vec<u8> = (0..32).collect();
    let file = temp_binary(&data);

    let mut mem = MemoryImage::new(16);
    let n = loader::load_program(&mut mem, file.path().to_str().unwrap());
    assert_eq!(n, 16);
}

#[test]
fn missing_file_leaves_memory_zeroed() {
    let mut mem = MemoryImage::new(64);
    let n = loader::load_program(&mut mem, "no/such/program.bin");
    assert_eq!(n, 0);
    assert_eq!(mem.read_data(0, 4), 0);
}

#[test]
fn simulator_runs_with_missing_program() {
    // Loader absence is a diagnostic, not a fatal error: the core still
    // advances the clock over a zeroed image.
    let mut sim = Simulator::new(&Config::default());
    assert_eq!(sim.load_program("no/such/program.bin"), 0);
    sim.run_reset();
    sim.run_for_ns(200);
    assert_eq!(sim.processor.analyzer.total_cycles, 21);
}
