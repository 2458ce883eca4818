//! RISC-V Integer Multiplication and Division Extension (RV32M).
//!
//! RV32M instructions share the `OP_REG` major opcode with the base set and
//! are selected by `funct7 == 1`; `funct3` selects the operation.

/// Function code 3 definitions for multiply/divide operations.
pub mod funct3;
