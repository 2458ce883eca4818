//! RV32I function codes (funct7).

/// Standard encoding (ADD, SRL, SLL, ...).
pub const MAIN: u32 = 0b0000000;

/// Alternate encoding (SUB, SRA).
pub const ALT: u32 = 0b0100000;

/// Multiply/divide extension encoding (funct7 = 1 selects RV32M).
pub const MULDIV: u32 = 0b0000001;
