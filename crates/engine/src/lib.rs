//! RV32 vector-core instruction-set simulator library.
//!
//! This crate implements an architectural (not cycle-accurate) simulator for a
//! RISC-V RV32IM core extended with vector operations, built around
//! tightly-coupled memories. It provides:
//! 1. **Core:** GPR, vector register file, CSR state, trap entry, and the
//!    fetch/decode/execute engine.
//! 2. **Memory:** An ITCM region plus configurable LSU access windows with
//!    whole-access permission checking and a check-free debug path.
//! 3. **ISA:** Decoding and execution for RV32I/M, Zicsr, privileged
//!    operations, and a unit-stride vector subset (VLEN = 128).
//! 4. **Simulation:** ELF loading, execution-control state machine
//!    (load/run/wait/step), and cycle accounting.

/// Common types (access kinds, traps, host-facing errors, constants).
pub mod common;
/// Simulator configuration (ITCM geometry, LSU windows, misa, ebreak policy).
pub mod config;
/// CPU core (registers, CSRs, vector unit, trap entry, execution engine).
pub mod core;
/// Instruction set (decode, instruction fields, RV32I/M, privileged, vector).
pub mod isa;
/// Memory subsystem (ITCM + LSU access windows).
pub mod mem;
/// Program loading and the execution controller.
pub mod sim;

/// Root configuration type; use `SimulatorOptions::default()` or deserialize from JSON.
pub use crate::config::{LsuAccessRange, SimulatorOptions};
/// Execution controller; construct with `Simulator::new`.
pub use crate::sim::simulator::{ExecutionState, Simulator};
