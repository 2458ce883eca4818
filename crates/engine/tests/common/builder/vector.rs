//! Encoders for the supported vector instructions.
//!
//! All encoders produce the unmasked (`vm = 1`) forms unless noted.

use vcsim_core::isa::rvv::opcodes;

const VM: u32 = 1 << 25;

/// `vtype` encoding for SEW = 8, LMUL = 1.
pub const VTYPE_E8M1: u32 = 0b000_000;
/// `vtype` encoding for SEW = 16, LMUL = 1.
pub const VTYPE_E16M1: u32 = 0b001_000;
/// `vtype` encoding for SEW = 32, LMUL = 1.
pub const VTYPE_E32M1: u32 = 0b010_000;

/// `vsetvli rd, rs1, vtype`.
pub fn vsetvli(rd: u32, rs1: u32, vtype: u32) -> u32 {
    ((vtype & 0x7FF) << 20)
        | ((rs1 & 0x1F) << 15)
        | (opcodes::OPCFG << 12)
        | ((rd & 0x1F) << 7)
        | opcodes::OP_V
}

/// `vsetivli rd, uimm, vtype`.
pub fn vsetivli(rd: u32, uimm: u32, vtype: u32) -> u32 {
    (0b11 << 30)
        | ((vtype & 0x3FF) << 20)
        | ((uimm & 0x1F) << 15)
        | (opcodes::OPCFG << 12)
        | ((rd & 0x1F) << 7)
        | opcodes::OP_V
}

/// `vsetvl rd, rs1, rs2`.
pub fn vsetvl(rd: u32, rs1: u32, rs2: u32) -> u32 {
    (0b1000000 << 25)
        | ((rs2 & 0x1F) << 20)
        | ((rs1 & 0x1F) << 15)
        | (opcodes::OPCFG << 12)
        | ((rd & 0x1F) << 7)
        | opcodes::OP_V
}

fn opivv(funct6: u32, vd: u32, vs2: u32, vs1: u32) -> u32 {
    (funct6 << 26)
        | VM
        | ((vs2 & 0x1F) << 20)
        | ((vs1 & 0x1F) << 15)
        | (opcodes::OPIVV << 12)
        | ((vd & 0x1F) << 7)
        | opcodes::OP_V
}

fn opivx(funct6: u32, vd: u32, vs2: u32, rs1: u32) -> u32 {
    (funct6 << 26)
        | VM
        | ((vs2 & 0x1F) << 20)
        | ((rs1 & 0x1F) << 15)
        | (opcodes::OPIVX << 12)
        | ((vd & 0x1F) << 7)
        | opcodes::OP_V
}

fn opivi(funct6: u32, vd: u32, vs2: u32, simm5: i32) -> u32 {
    (funct6 << 26)
        | VM
        | ((vs2 & 0x1F) << 20)
        | (((simm5 as u32) & 0x1F) << 15)
        | (opcodes::OPIVI << 12)
        | ((vd & 0x1F) << 7)
        | opcodes::OP_V
}

pub fn vadd_vv(vd: u32, vs2: u32, vs1: u32) -> u32 {
    opivv(opcodes::VADD, vd, vs2, vs1)
}

pub fn vadd_vx(vd: u32, vs2: u32, rs1: u32) -> u32 {
    opivx(opcodes::VADD, vd, vs2, rs1)
}

pub fn vadd_vi(vd: u32, vs2: u32, simm5: i32) -> u32 {
    opivi(opcodes::VADD, vd, vs2, simm5)
}

pub fn vsub_vv(vd: u32, vs2: u32, vs1: u32) -> u32 {
    opivv(opcodes::VSUB, vd, vs2, vs1)
}

pub fn vrsub_vi(vd: u32, vs2: u32, simm5: i32) -> u32 {
    opivi(opcodes::VRSUB, vd, vs2, simm5)
}

pub fn vxor_vv(vd: u32, vs2: u32, vs1: u32) -> u32 {
    opivv(opcodes::VXOR, vd, vs2, vs1)
}

pub fn vand_vx(vd: u32, vs2: u32, rs1: u32) -> u32 {
    opivx(opcodes::VAND, vd, vs2, rs1)
}

/// `vmv.v.i vd, simm5` (vs2 must encode as v0).
pub fn vmv_v_i(vd: u32, simm5: i32) -> u32 {
    opivi(opcodes::VMV, vd, 0, simm5)
}

/// `vid.v vd`.
pub fn vid_v(vd: u32) -> u32 {
    (opcodes::VMUNARY0 << 26)
        | VM
        | ((opcodes::VID_VS1 as u32) << 15)
        | (opcodes::OPMVV << 12)
        | ((vd & 0x1F) << 7)
        | opcodes::OP_V
}

fn unit_stride(opcode: u32, width: u32, reg: u32, rs1: u32, vm: bool) -> u32 {
    let mask = if vm { VM } else { 0 };
    mask | ((rs1 & 0x1F) << 15) | (width << 12) | ((reg & 0x1F) << 7) | opcode
}

pub fn vle8(vd: u32, rs1: u32) -> u32 {
    unit_stride(opcodes::OP_V_LOAD, opcodes::EEW8, vd, rs1, true)
}

pub fn vle16(vd: u32, rs1: u32) -> u32 {
    unit_stride(opcodes::OP_V_LOAD, opcodes::EEW16, vd, rs1, true)
}

pub fn vle32(vd: u32, rs1: u32) -> u32 {
    unit_stride(opcodes::OP_V_LOAD, opcodes::EEW32, vd, rs1, true)
}

pub fn vse8(vs3: u32, rs1: u32) -> u32 {
    unit_stride(opcodes::OP_V_STORE, opcodes::EEW8, vs3, rs1, true)
}

pub fn vse32(vs3: u32, rs1: u32) -> u32 {
    unit_stride(opcodes::OP_V_STORE, opcodes::EEW32, vs3, rs1, true)
}

/// Masked unit-stride store, which the core rejects as illegal.
pub fn vse8_masked(vs3: u32, rs1: u32) -> u32 {
    unit_stride(opcodes::OP_V_STORE, opcodes::EEW8, vs3, rs1, false)
}
