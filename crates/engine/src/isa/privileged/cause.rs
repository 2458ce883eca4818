//! Trap cause codes.
//!
//! Exception codes written to the `mcause` CSR. Only synchronous exceptions
//! exist in this core; the interrupt bit is never set.

/// Exception definitions (MSB = 0).
pub mod exception {
    /// Instruction address misaligned (0).
    pub const INSTRUCTION_ADDRESS_MISALIGNED: u32 = 0;
    /// Instruction access fault (1).
    pub const INSTRUCTION_ACCESS_FAULT: u32 = 1;
    /// Illegal instruction (2).
    pub const ILLEGAL_INSTRUCTION: u32 = 2;
    /// Breakpoint (3).
    pub const BREAKPOINT: u32 = 3;
    /// Load access fault (5).
    pub const LOAD_ACCESS_FAULT: u32 = 5;
    /// Store access fault (7).
    pub const STORE_ACCESS_FAULT: u32 = 7;
    /// Environment call from M-mode (11).
    pub const ENVIRONMENT_CALL_FROM_M_MODE: u32 = 11;
}
