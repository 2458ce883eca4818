//! Privileged architecture definitions.
//!
//! Trap cause codes and system-instruction encodings (CSR access,
//! environment calls, trap return, and the simulator halt instruction).

/// Trap cause codes for `mcause`.
pub mod cause;

/// System instruction opcodes and encodings.
pub mod opcodes;
