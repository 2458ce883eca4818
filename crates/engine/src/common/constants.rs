//! Global constants.
//!
//! System-wide constants for instruction and vector-unit geometry.

/// Size of a standard 32-bit instruction in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Vector register width in bits.
pub const VLEN_BITS: usize = 128;

/// Vector register width in bytes (the architectural `vlenb` value).
pub const VLEN_BYTES: usize = VLEN_BITS / 8;

/// Maximum supported element width in bits.
pub const ELEN_BITS: u32 = 32;
