//! Common types shared across the simulator.
//!
//! Fundamental building blocks used by every component:
//! 1. **Constants:** Instruction and vector geometry.
//! 2. **Memory Access:** Classification of memory operations (Fetch/Read/Write).
//! 3. **Error Handling:** Architectural traps and host-facing error types.

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Trap and host-error definitions.
pub mod error;

pub use data::AccessType;
pub use error::{SimulatorError, Trap};
