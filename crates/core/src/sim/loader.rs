//! Program image loading.
//!
//! Reads a raw binary from disk and copies it byte-for-byte to offset 0 of
//! the memory image. A missing or unreadable file is a diagnostic, not a
//! fatal error: memory stays zeroed and the simulation proceeds.

use std::fs;
use std::io;

use crate::mem::MemoryImage;
use log::{info, warn};

/// Reads a raw binary file from disk.
pub fn load_binary(path: &str) -> io::Result<Vec<u8>> {
    fs::read(path)
}

/// Loads a program file into the memory image at offset 0.
///
/// Returns the number of bytes loaded; zero when the file could not be read
/// (the image is left as it was).
pub fn load_program(mem: &mut MemoryImage, path: &str) -> usize {
    match load_binary(path) {
        Ok(image) => {
            let n = mem.load_image(&image);
            info!("loaded {} bytes from {}", n, path);
            n
        }
        Err(e) => {
            warn!("could not read program file '{}': {}", path, e);
            0
        }
    }
}
