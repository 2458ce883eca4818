//! Vector unit execution.
//!
//! Implements the supported vector subset:
//! 1. **Configuration:** `vsetvli`, `vsetivli`, and `vsetvl` with SEW of
//!    8/16/32 and LMUL fixed at 1.
//! 2. **Unit-Stride Memory:** `vle8/16/32.v` and `vse8/16/32.v`, checked
//!    against the accessible windows as a whole before any byte moves.
//! 3. **Integer ALU:** add, subtract, reverse-subtract, bitwise logic, and
//!    move/splat in the vv/vx/vi forms, plus `vid.v`.
//!
//! Masked loads and stores are not implemented and raise an illegal
//! instruction; masked arithmetic honors the `v0` mask bits.

use super::Core;
use crate::common::constants::{ELEN_BITS, VLEN_BITS, VLEN_BYTES};
use crate::common::{AccessType, Trap};
use crate::isa::instruction::Decoded;
use crate::isa::rvv::opcodes;

/// Decoded `vtype` fields relevant to this implementation.
#[derive(Clone, Copy, Debug)]
struct Vtype {
    sew: u32,
    vill: bool,
}

/// Bit set in `vtype` when the requested configuration is unsupported.
const VILL: u32 = 1 << 31;

fn decode_vtype(raw: u32) -> Vtype {
    let vlmul = raw & 0b111;
    let vsew = (raw >> 3) & 0b111;
    let sew = match vsew {
        0b000 => 8,
        0b001 => 16,
        0b010 => 32,
        _ => 0,
    };
    // Only LMUL = 1 is supported; reserved upper bits must be zero.
    let vill = raw & VILL != 0 || raw & !0xFF != 0 || vlmul != 0 || sew == 0 || sew > ELEN_BITS;
    Vtype { sew, vill }
}

fn vlmax(sew: u32) -> u32 {
    VLEN_BITS as u32 / sew
}

/// Mask enable bit (bit 25): set means the operation is unmasked.
fn unmasked(inst: u32) -> bool {
    inst & (1 << 25) != 0
}

impl Core {
    /// Current SEW, or `None` when `vtype` holds an unsupported
    /// configuration.
    fn vector_sew(&self) -> Option<u32> {
        let vt = decode_vtype(self.csrs.vtype);
        if vt.vill { None } else { Some(vt.sew) }
    }

    fn apply_vtype(&mut self, rd: usize, avl: u32, vtype_raw: u32) {
        let vt = decode_vtype(vtype_raw);
        if vt.vill {
            self.csrs.vtype = VILL;
            self.csrs.vl = 0;
        } else {
            self.csrs.vtype = vtype_raw & 0xFF;
            self.csrs.vl = avl.min(vlmax(vt.sew));
        }
        self.csrs.vstart = 0;
        self.regs.write(rd, self.csrs.vl);
    }

    /// OP-V opcode: configuration and integer arithmetic.
    pub(super) fn exec_vector(&mut self, inst: u32, d: &Decoded) -> Result<(), Trap> {
        match d.funct3 {
            opcodes::OPCFG => self.exec_vector_cfg(inst, d),
            opcodes::OPIVV | opcodes::OPIVI | opcodes::OPIVX => self.exec_vector_alu(inst, d),
            opcodes::OPMVV => {
                let funct6 = d.funct7 >> 1;
                if funct6 == opcodes::VMUNARY0 && d.rs1 == opcodes::VID_VS1 {
                    self.exec_vid(inst, d)
                } else {
                    Err(Trap::IllegalInstruction(inst))
                }
            }
            _ => Err(Trap::IllegalInstruction(inst)),
        }
    }

    fn exec_vector_cfg(&mut self, inst: u32, d: &Decoded) -> Result<(), Trap> {
        if inst >> 31 == 0 {
            // vsetvli: vtype immediate in bits [30:20].
            let vtype_raw = (inst >> 20) & 0x7FF;
            let avl = self.cfg_avl(d);
            self.apply_vtype(d.rd, avl, vtype_raw);
            Ok(())
        } else if inst >> 30 == 0b11 {
            // vsetivli: vtype immediate in bits [29:20], AVL in the rs1
            // field.
            let vtype_raw = (inst >> 20) & 0x3FF;
            self.apply_vtype(d.rd, d.rs1 as u32, vtype_raw);
            Ok(())
        } else if d.funct7 == 0b100_0000 {
            // vsetvl: vtype in rs2.
            let vtype_raw = self.regs.read(d.rs2);
            let avl = self.cfg_avl(d);
            self.apply_vtype(d.rd, avl, vtype_raw);
            Ok(())
        } else {
            Err(Trap::IllegalInstruction(inst))
        }
    }

    /// AVL for the register forms: `x[rs1]`, or VLMAX when `rs1` is `x0` and
    /// `rd` is not, or the current `vl` when both are `x0`.
    fn cfg_avl(&self, d: &Decoded) -> u32 {
        if d.rs1 != 0 {
            self.regs.read(d.rs1)
        } else if d.rd != 0 {
            u32::MAX
        } else {
            self.csrs.vl
        }
    }

    fn exec_vector_alu(&mut self, inst: u32, d: &Decoded) -> Result<(), Trap> {
        let sew = self.vector_sew().ok_or(Trap::IllegalInstruction(inst))?;
        let funct6 = d.funct7 >> 1;
        let vm = unmasked(inst);
        let vl = self.csrs.vl as usize;

        // Scalar or immediate operand for the vx/vi forms. The 5-bit
        // immediate is sign-extended.
        let scalar = match d.funct3 {
            opcodes::OPIVX => self.regs.read(d.rs1),
            opcodes::OPIVI => ((((d.rs1 as u32) << 27) as i32) >> 27) as u32,
            _ => 0,
        };

        if funct6 == opcodes::VMV {
            // vmv.v.* requires vs2 = v0 and vm = 1.
            if !vm || d.rs2 != 0 {
                return Err(Trap::IllegalInstruction(inst));
            }
            for i in 0..vl {
                let val = match d.funct3 {
                    opcodes::OPIVV => self.vregs.read_elem(d.rs1, sew, i),
                    _ => scalar,
                };
                self.vregs.write_elem(d.rd, sew, i, val);
            }
            return Ok(());
        }

        for i in 0..vl {
            if !vm && !self.vregs.mask_bit(i) {
                continue;
            }
            let vs2 = self.vregs.read_elem(d.rs2, sew, i);
            let rhs = match d.funct3 {
                opcodes::OPIVV => self.vregs.read_elem(d.rs1, sew, i),
                _ => scalar,
            };
            let result = match funct6 {
                opcodes::VADD => vs2.wrapping_add(rhs),
                opcodes::VSUB if d.funct3 != opcodes::OPIVI => vs2.wrapping_sub(rhs),
                opcodes::VRSUB if d.funct3 != opcodes::OPIVV => rhs.wrapping_sub(vs2),
                opcodes::VAND => vs2 & rhs,
                opcodes::VOR => vs2 | rhs,
                opcodes::VXOR => vs2 ^ rhs,
                _ => return Err(Trap::IllegalInstruction(inst)),
            };
            self.vregs.write_elem(d.rd, sew, i, result);
        }
        Ok(())
    }

    fn exec_vid(&mut self, inst: u32, d: &Decoded) -> Result<(), Trap> {
        let sew = self.vector_sew().ok_or(Trap::IllegalInstruction(inst))?;
        let vm = unmasked(inst);
        for i in 0..self.csrs.vl as usize {
            if !vm && !self.vregs.mask_bit(i) {
                continue;
            }
            self.vregs.write_elem(d.rd, sew, i, i as u32);
        }
        Ok(())
    }

    /// Width and element size in bytes for a unit-stride memory encoding, or
    /// an illegal-instruction trap for anything outside the supported subset
    /// (masked, strided, indexed, segmented, or fault-only-first forms).
    fn unit_stride_bytes(inst: u32, d: &Decoded) -> Result<usize, Trap> {
        let mop = (inst >> 26) & 0b11;
        let nf = inst >> 29;
        if !unmasked(inst) || mop != 0 || nf != 0 || d.rs2 != 0 {
            return Err(Trap::IllegalInstruction(inst));
        }
        match d.funct3 {
            opcodes::EEW8 => Ok(1),
            opcodes::EEW16 => Ok(2),
            opcodes::EEW32 => Ok(4),
            _ => Err(Trap::IllegalInstruction(inst)),
        }
    }

    /// Span in bytes covered by a unit-stride access, or an
    /// illegal-instruction trap when `vtype` is unsupported or the span
    /// would spill past a single register (EEW wider than the configured
    /// SEW implies a group, which is outside the supported subset).
    fn unit_stride_span(&self, inst: u32, ewb: usize) -> Result<usize, Trap> {
        self.vector_sew().ok_or(Trap::IllegalInstruction(inst))?;
        let span = self.csrs.vl as usize * ewb;
        if span > VLEN_BYTES {
            return Err(Trap::IllegalInstruction(inst));
        }
        Ok(span)
    }

    /// Unit-stride vector load. The full `vl * EEW` span is checked before
    /// any element is transferred.
    pub(super) fn exec_vector_load(&mut self, inst: u32, d: &Decoded) -> Result<(), Trap> {
        let ewb = Self::unit_stride_bytes(inst, d)?;
        let span = self.unit_stride_span(inst, ewb)?;
        let base = self.regs.read(d.rs1);
        if span == 0 {
            return Ok(());
        }

        let mut reg = *self.vregs.bytes(d.rd);
        self.mem.read(base, &mut reg[..span], AccessType::Read)?;
        self.vregs.set_bytes(d.rd, &reg);
        Ok(())
    }

    /// Unit-stride vector store. The full `vl * EEW` span is checked before
    /// any byte reaches memory.
    pub(super) fn exec_vector_store(&mut self, inst: u32, d: &Decoded) -> Result<(), Trap> {
        let ewb = Self::unit_stride_bytes(inst, d)?;
        let span = self.unit_stride_span(inst, ewb)?;
        let base = self.regs.read(d.rs1);
        if span == 0 {
            return Ok(());
        }

        let data = *self.vregs.bytes(d.rd);
        self.mem.write(base, &data[..span], AccessType::Write)?;
        Ok(())
    }
}
