//! ELF program loading.
//!
//! This module turns an RV32 ELF executable into a [`ProgramImage`]: the
//! entry point plus the loadable segments with their in-memory sizes (BSS
//! zero-filled). It performs:
//! 1. **Parsing:** Reads the ELF container via the `object` crate.
//! 2. **Validation:** Rejects non-RISC-V-32 binaries.
//! 3. **Segment extraction:** Collects loadable segments, padding each to
//!    its full memory size.

use std::fs;
use std::path::Path;

use object::{Architecture, Object, ObjectSegment};
use tracing::debug;

use crate::common::SimulatorError;

/// One loadable segment of a program.
#[derive(Clone, Debug)]
pub struct Segment {
    /// Target address of the first byte.
    pub address: u32,
    /// Segment contents, already padded to the in-memory size.
    pub data: Vec<u8>,
}

/// A program ready to be placed into simulator memory.
#[derive(Clone, Debug)]
pub struct ProgramImage {
    /// Initial program counter.
    pub entry: u32,
    /// Loadable segments.
    pub segments: Vec<Segment>,
}

/// Parses an RV32 ELF executable from a byte buffer.
///
/// # Errors
///
/// Returns [`SimulatorError::LoadFailure`] when the buffer is not a valid
/// ELF file, targets an architecture other than 32-bit RISC-V, or a segment
/// cannot be read.
pub fn load_elf_bytes(bytes: &[u8]) -> Result<ProgramImage, SimulatorError> {
    let file = object::File::parse(bytes)
        .map_err(|e| SimulatorError::LoadFailure(format!("not a valid ELF file: {e}")))?;

    if file.architecture() != Architecture::Riscv32 {
        return Err(SimulatorError::LoadFailure(format!(
            "unsupported architecture {:?}, expected Riscv32",
            file.architecture()
        )));
    }

    let mut segments = Vec::new();
    for segment in file.segments() {
        let size = segment.size() as usize;
        if size == 0 {
            continue;
        }
        let mut data = segment
            .data()
            .map_err(|e| SimulatorError::LoadFailure(format!("unreadable segment: {e}")))?
            .to_vec();
        // A memory size beyond the file size is BSS.
        data.resize(size, 0);

        debug!(
            address = format_args!("{:#010x}", segment.address()),
            size, "loadable segment"
        );
        segments.push(Segment {
            address: segment.address() as u32,
            data,
        });
    }

    Ok(ProgramImage {
        entry: file.entry() as u32,
        segments,
    })
}

/// Reads and parses an RV32 ELF executable from disk.
///
/// # Errors
///
/// Returns [`SimulatorError::LoadFailure`] when the file cannot be read or
/// is not a valid RV32 ELF executable.
pub fn load_elf_file<P: AsRef<Path>>(path: P) -> Result<ProgramImage, SimulatorError> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .map_err(|e| SimulatorError::LoadFailure(format!("{}: {e}", path.display())))?;
    load_elf_bytes(&bytes)
}
