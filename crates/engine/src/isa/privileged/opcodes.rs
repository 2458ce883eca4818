//! Privileged and system instruction encodings.
//!
//! Full 32-bit encodings for the zero-operand system instructions, plus the
//! CSR-access funct3 codes, all under the SYSTEM major opcode.

/// System instruction opcode (0b1110011).
/// Used for CSR instructions, ECALL, EBREAK, MRET, WFI, and MPAUSE.
pub const OP_SYSTEM: u32 = 0b1110011;

/// Environment Call (ECALL).
pub const ECALL: u32 = 0x0000_0073;

/// Environment Break (EBREAK).
/// Stops execution or traps, depending on the configured breakpoint policy.
pub const EBREAK: u32 = 0x0010_0073;

/// Machine Return (MRET).
/// Returns from the M-mode trap handler.
pub const MRET: u32 = 0x3020_0073;

/// Wait for Interrupt (WFI). Executes as a no-op.
pub const WFI: u32 = 0x1050_0073;

/// Machine Pause (MPAUSE), the halt instruction.
/// Terminates simulated execution cleanly and reports success.
pub const MPAUSE: u32 = 0x0800_0073;

/// Atomic Read/Write CSR (CSRRW).
pub const CSRRW: u32 = 0b001;
/// Atomic Read and Set Bits in CSR (CSRRS).
pub const CSRRS: u32 = 0b010;
/// Atomic Read and Clear Bits in CSR (CSRRC).
pub const CSRRC: u32 = 0b011;
/// Atomic Read/Write CSR Immediate (CSRRWI).
pub const CSRRWI: u32 = 0b101;
/// Atomic Read and Set Bits in CSR Immediate (CSRRSI).
pub const CSRRSI: u32 = 0b110;
/// Atomic Read and Clear Bits in CSR Immediate (CSRRCI).
pub const CSRRCI: u32 = 0b111;
