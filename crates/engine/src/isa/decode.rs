//! RISC-V instruction decoder.
//!
//! Decodes 32-bit instruction encodings into the structured [`Decoded`]
//! format: opcode, register indices, function codes, and sign-extended
//! immediates for the R, I, S, B, U, and J formats. Vector instructions keep
//! their format-specific fields in `raw`; the vector unit extracts those
//! itself.

use crate::isa::instruction::{Decoded, InstructionBits};
use crate::isa::rv32i::opcodes;

/// Total width of an instruction in bits.
const INSTRUCTION_WIDTH: u32 = 32;

/// Decodes an instruction into its component fields.
///
/// # Arguments
///
/// * `inst` - The 32-bit instruction encoding to decode.
pub fn decode(inst: u32) -> Decoded {
    let opcode = inst.opcode();

    let imm = match opcode {
        opcodes::OP_IMM | opcodes::OP_LOAD | opcodes::OP_JALR => decode_i_type_imm(inst),
        opcodes::OP_STORE => decode_s_type_imm(inst),
        opcodes::OP_BRANCH => decode_b_type_imm(inst),
        opcodes::OP_LUI | opcodes::OP_AUIPC => decode_u_type_imm(inst),
        opcodes::OP_JAL => decode_j_type_imm(inst),
        _ => 0,
    };

    Decoded {
        raw: inst,
        opcode,
        rd: InstructionBits::rd(&inst),
        rs1: InstructionBits::rs1(&inst),
        rs2: InstructionBits::rs2(&inst),
        funct3: InstructionBits::funct3(&inst),
        funct7: InstructionBits::funct7(&inst),
        imm,
    }
}

/// I-Type format: `imm[11:0] | rs1 | funct3 | rd | opcode`.
fn decode_i_type_imm(inst: u32) -> i32 {
    (inst as i32) >> 20
}

/// S-Type format: `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`.
fn decode_s_type_imm(inst: u32) -> i32 {
    let low = (inst >> 7) & 0x1F;
    let high = (inst >> 25) & 0x7F;
    sign_extend((high << 5) | low, 12)
}

/// B-Type format: `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] | imm[11] | opcode`.
///
/// The immediate is a signed even offset.
fn decode_b_type_imm(inst: u32) -> i32 {
    let bit_11 = (inst >> 7) & 1;
    let bits_4_1 = (inst >> 8) & 0xF;
    let bits_10_5 = (inst >> 25) & 0x3F;
    let bit_12 = (inst >> 31) & 1;

    let combined = (bit_12 << 12) | (bit_11 << 11) | (bits_10_5 << 5) | (bits_4_1 << 1);
    sign_extend(combined, 13)
}

/// U-Type format: `imm[31:12] | rd | opcode`.
fn decode_u_type_imm(inst: u32) -> i32 {
    (inst & 0xFFFF_F000) as i32
}

/// J-Type format: `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd | opcode`.
///
/// The immediate is a signed even offset.
fn decode_j_type_imm(inst: u32) -> i32 {
    let bits_19_12 = (inst >> 12) & 0xFF;
    let bit_11 = (inst >> 20) & 1;
    let bits_10_1 = (inst >> 21) & 0x3FF;
    let bit_20 = (inst >> 31) & 1;

    let combined = (bit_20 << 20) | (bits_19_12 << 12) | (bit_11 << 11) | (bits_10_1 << 1);
    sign_extend(combined, 21)
}

/// Sign extends a value of `bits` width to a 32-bit signed integer.
fn sign_extend(val: u32, bits: u32) -> i32 {
    let shift = INSTRUCTION_WIDTH - bits;
    ((val as i32) << shift) >> shift
}
