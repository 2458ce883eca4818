//! Instruction encoding utilities.
//!
//! Bit extraction for the standard RISC-V instruction fields and the
//! `Decoded` structure produced by the decoder.

/// Bit mask for extracting the opcode field (bits 0-6).
pub const OPCODE_MASK: u32 = 0x7F;
/// Bit mask for extracting a 5-bit register field.
pub const REG_MASK: u32 = 0x1F;
/// Bit mask for extracting the funct3 field (bits 12-14).
pub const FUNCT3_MASK: u32 = 0x7;
/// Bit mask for extracting the funct7 field (bits 25-31).
pub const FUNCT7_MASK: u32 = 0x7F;
/// Bit mask for extracting the CSR address field (bits 20-31).
pub const CSR_MASK: u32 = 0xFFF;

/// Trait for extracting instruction fields from encoded instructions.
pub trait InstructionBits {
    /// Extracts the opcode field (bits 0-6).
    fn opcode(&self) -> u32;

    /// Extracts the destination register field (bits 7-11).
    fn rd(&self) -> usize;

    /// Extracts the first source register field (bits 15-19).
    fn rs1(&self) -> usize;

    /// Extracts the second source register field (bits 20-24).
    fn rs2(&self) -> usize;

    /// Extracts the funct3 field (bits 12-14).
    fn funct3(&self) -> u32;

    /// Extracts the funct7 field (bits 25-31).
    fn funct7(&self) -> u32;

    /// Extracts the CSR address field (bits 20-31).
    fn csr(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self & OPCODE_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 7) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> 15) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> 20) & REG_MASK) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        (self >> 12) & FUNCT3_MASK
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        (self >> 25) & FUNCT7_MASK
    }

    #[inline(always)]
    fn csr(&self) -> u32 {
        (self >> 20) & CSR_MASK
    }
}

/// Decoded instruction containing all extracted fields.
#[derive(Clone, Debug, Default)]
pub struct Decoded {
    /// Raw 32-bit instruction encoding.
    pub raw: u32,
    /// Extracted opcode field.
    pub opcode: u32,
    /// Destination register index.
    pub rd: usize,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Function code field 3.
    pub funct3: u32,
    /// Function code field 7.
    pub funct7: u32,
    /// Sign-extended immediate value.
    pub imm: i32,
}
