//! Instruction Set Architecture (ISA) definitions.
//!
//! Opcodes, function codes, and decoding logic, organized by extension.
//!
//! # Extensions
//!
//! * `rv32i`: Base Integer Instruction Set (32-bit).
//! * `rv32m`: Integer Multiplication and Division.
//! * `privileged`: Privileged architecture (CSR instructions, traps, halt).
//! * `rvv`: The supported vector-operation subset.

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Instruction decoding logic for the supported instruction formats.
pub mod decode;

/// Instruction encoding structures and bit extraction utilities.
pub mod instruction;

/// Privileged architecture definitions (CSR access, trap causes, halt).
pub mod privileged;

/// Base integer instruction set (32-bit core instructions).
pub mod rv32i;

/// Integer multiply/divide extension (MUL, DIV, REM instructions).
pub mod rv32m;

/// Vector extension subset (configuration, unit-stride memory, integer ALU).
pub mod rvv;
