//! Trap and host-error definitions.
//!
//! Two disjoint failure vocabularies live here:
//! 1. **Traps:** Synchronous architectural exceptions, handled inside the
//!    simulated program via the trap controller. Never surfaced to the host
//!    caller as errors.
//! 2. **Simulator errors:** Host-facing failures (bad images, state-machine
//!    misuse, unknown register names, out-of-range debug accesses).

use std::fmt;

use thiserror::Error;

use crate::isa::privileged::cause::exception;

/// Synchronous architectural exceptions raised during simulated execution.
///
/// Each variant carries the architectural trap value (the faulting address,
/// or the offending instruction encoding for illegal instructions) that the
/// trap controller writes to `mtval`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trap {
    /// Instruction fetch at a PC that is not 4-byte aligned.
    InstructionAddressMisaligned(u32),

    /// Instruction fetch outside the ITCM.
    InstructionAccessFault(u32),

    /// Invalid or unimplemented instruction encoding.
    IllegalInstruction(u32),

    /// `ebreak` executed while configured to trap rather than stop.
    Breakpoint(u32),

    /// Load whose byte span is not fully contained in a permitted region.
    LoadAccessFault(u32),

    /// Store whose byte span is not fully contained in a permitted region.
    StoreAccessFault(u32),

    /// `ecall` executed (machine mode is the only implemented mode).
    EnvironmentCallFromMMode,
}

impl Trap {
    /// Architectural cause code written to `mcause`.
    pub fn cause(&self) -> u32 {
        match self {
            Trap::InstructionAddressMisaligned(_) => exception::INSTRUCTION_ADDRESS_MISALIGNED,
            Trap::InstructionAccessFault(_) => exception::INSTRUCTION_ACCESS_FAULT,
            Trap::IllegalInstruction(_) => exception::ILLEGAL_INSTRUCTION,
            Trap::Breakpoint(_) => exception::BREAKPOINT,
            Trap::LoadAccessFault(_) => exception::LOAD_ACCESS_FAULT,
            Trap::StoreAccessFault(_) => exception::STORE_ACCESS_FAULT,
            Trap::EnvironmentCallFromMMode => exception::ENVIRONMENT_CALL_FROM_M_MODE,
        }
    }

    /// Architectural trap value written to `mtval`.
    pub fn value(&self) -> u32 {
        match self {
            Trap::InstructionAddressMisaligned(addr)
            | Trap::InstructionAccessFault(addr)
            | Trap::LoadAccessFault(addr)
            | Trap::StoreAccessFault(addr)
            | Trap::Breakpoint(addr) => *addr,
            Trap::IllegalInstruction(inst) => *inst,
            Trap::EnvironmentCallFromMMode => 0,
        }
    }
}

impl fmt::Display for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trap::InstructionAddressMisaligned(addr) => {
                write!(f, "InstructionAddressMisaligned({addr:#x})")
            }
            Trap::InstructionAccessFault(addr) => write!(f, "InstructionAccessFault({addr:#x})"),
            Trap::IllegalInstruction(inst) => write!(f, "IllegalInstruction({inst:#x})"),
            Trap::Breakpoint(pc) => write!(f, "Breakpoint({pc:#x})"),
            Trap::LoadAccessFault(addr) => write!(f, "LoadAccessFault({addr:#x})"),
            Trap::StoreAccessFault(addr) => write!(f, "StoreAccessFault({addr:#x})"),
            Trap::EnvironmentCallFromMMode => write!(f, "EnvironmentCallFromMMode"),
        }
    }
}

impl std::error::Error for Trap {}

/// Host-facing simulator errors.
///
/// These report configuration problems and control-surface misuse to the
/// external caller. Architectural faults never appear here; they are normal
/// simulated-program behavior routed through the trap controller.
#[derive(Debug, Error)]
pub enum SimulatorError {
    /// The program image is malformed, does not fit the configured memory
    /// regions, or the requested entry point is invalid.
    #[error("program load failed: {0}")]
    LoadFailure(String),

    /// An execution-control operation was issued from a state that does not
    /// permit it (e.g. `run` while already running, `wait` with no run in
    /// flight).
    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// A register read used a name the simulator does not recognize.
    #[error("unknown register: {0:?}")]
    UnknownRegister(String),

    /// A debug memory access could not transfer a single byte.
    #[error("memory access at {address:#x}+{length:#x} is outside the addressable space")]
    MemoryRangeExceeded {
        /// Requested start address.
        address: u64,
        /// Requested transfer length in bytes.
        length: usize,
    },

    /// The engine thread panicked during an asynchronous run.
    #[error("execution thread panicked")]
    EnginePanicked,
}
