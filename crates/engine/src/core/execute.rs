//! Scalar instruction execution.
//!
//! This module implements the execute stage of the core. It performs the
//! following:
//! 1. **Integer ALU:** RV32I arithmetic, logic, shifts, and comparisons.
//! 2. **Multiply/Divide:** RV32M with the architectural divide-by-zero and
//!    overflow results.
//! 3. **Control Flow:** Branches, jumps, and trap-return sequencing.
//! 4. **System Instructions:** CSR accesses, `ecall`, `ebreak`, `mpause`,
//!    and `wfi`.
//!
//! Every instruction either retires (possibly requesting a stop) or raises a
//! [`Trap`] for the trap controller to latch. Loads and stores delegate their
//! permission checks to the memory subsystem.

use super::{Core, StopReason};
use crate::common::Trap;
use crate::common::constants::INSTRUCTION_SIZE;
use crate::core::csr;
use crate::isa::decode::decode;
use crate::isa::instruction::InstructionBits;
use crate::isa::{privileged, rv32i, rv32m, rvv};

impl Core {
    /// Executes one decoded instruction at the current program counter.
    ///
    /// On success the program counter has been advanced (sequentially or by a
    /// taken branch/jump) and the result, if any, is architecturally visible.
    ///
    /// # Returns
    ///
    /// `Ok(Some(reason))` when the instruction requests a clean stop,
    /// `Ok(None)` when execution should continue, or `Err(trap)` when the
    /// instruction faults.
    ///
    /// # Errors
    ///
    /// Returns the [`Trap`] raised by the instruction: an access fault from a
    /// load or store, an environment call, a breakpoint when `ebreak` traps,
    /// or [`Trap::IllegalInstruction`] for unrecognized encodings.
    pub fn execute(&mut self, inst: u32) -> Result<Option<StopReason>, Trap> {
        let d = decode(inst);
        let next_pc = self.pc.wrapping_add(INSTRUCTION_SIZE);

        match d.opcode {
            rv32i::opcodes::OP_LUI => {
                self.regs.write(d.rd, d.imm as u32);
                self.pc = next_pc;
            }
            rv32i::opcodes::OP_AUIPC => {
                self.regs.write(d.rd, self.pc.wrapping_add(d.imm as u32));
                self.pc = next_pc;
            }
            rv32i::opcodes::OP_JAL => {
                self.regs.write(d.rd, next_pc);
                self.pc = self.pc.wrapping_add(d.imm as u32);
            }
            rv32i::opcodes::OP_JALR => {
                let target = self.regs.read(d.rs1).wrapping_add(d.imm as u32) & !1;
                self.regs.write(d.rd, next_pc);
                self.pc = target;
            }
            rv32i::opcodes::OP_BRANCH => {
                let taken = self.branch_taken(&d)?;
                self.pc = if taken {
                    self.pc.wrapping_add(d.imm as u32)
                } else {
                    next_pc
                };
            }
            rv32i::opcodes::OP_LOAD => {
                let addr = self.regs.read(d.rs1).wrapping_add(d.imm as u32);
                let value = match d.funct3 {
                    rv32i::funct3::LB => self.mem.load_u8(addr)? as i8 as i32 as u32,
                    rv32i::funct3::LH => self.mem.load_u16(addr)? as i16 as i32 as u32,
                    rv32i::funct3::LW => self.mem.load_u32(addr)?,
                    rv32i::funct3::LBU => u32::from(self.mem.load_u8(addr)?),
                    rv32i::funct3::LHU => u32::from(self.mem.load_u16(addr)?),
                    _ => return Err(Trap::IllegalInstruction(inst)),
                };
                self.regs.write(d.rd, value);
                self.pc = next_pc;
            }
            rv32i::opcodes::OP_STORE => {
                let addr = self.regs.read(d.rs1).wrapping_add(d.imm as u32);
                let value = self.regs.read(d.rs2);
                match d.funct3 {
                    rv32i::funct3::SB => self.mem.store_u8(addr, value as u8)?,
                    rv32i::funct3::SH => self.mem.store_u16(addr, value as u16)?,
                    rv32i::funct3::SW => self.mem.store_u32(addr, value)?,
                    _ => return Err(Trap::IllegalInstruction(inst)),
                }
                self.pc = next_pc;
            }
            rv32i::opcodes::OP_IMM => {
                let result = self.alu_imm(&d, inst)?;
                self.regs.write(d.rd, result);
                self.pc = next_pc;
            }
            rv32i::opcodes::OP_REG => {
                let result = self.alu_reg(&d, inst)?;
                self.regs.write(d.rd, result);
                self.pc = next_pc;
            }
            rv32i::opcodes::OP_MISC_MEM => {
                // fence / fence.i: single-hart, strongly-ordered memory, so
                // these retire as no-ops.
                self.pc = next_pc;
            }
            privileged::opcodes::OP_SYSTEM => return self.exec_system(inst, &d),
            rvv::opcodes::OP_V => {
                self.exec_vector(inst, &d)?;
                self.pc = next_pc;
            }
            rvv::opcodes::OP_V_LOAD => {
                self.exec_vector_load(inst, &d)?;
                self.pc = next_pc;
            }
            rvv::opcodes::OP_V_STORE => {
                self.exec_vector_store(inst, &d)?;
                self.pc = next_pc;
            }
            _ => return Err(Trap::IllegalInstruction(inst)),
        }

        Ok(None)
    }

    fn branch_taken(&self, d: &crate::isa::instruction::Decoded) -> Result<bool, Trap> {
        let lhs = self.regs.read(d.rs1);
        let rhs = self.regs.read(d.rs2);
        match d.funct3 {
            rv32i::funct3::BEQ => Ok(lhs == rhs),
            rv32i::funct3::BNE => Ok(lhs != rhs),
            rv32i::funct3::BLT => Ok((lhs as i32) < (rhs as i32)),
            rv32i::funct3::BGE => Ok((lhs as i32) >= (rhs as i32)),
            rv32i::funct3::BLTU => Ok(lhs < rhs),
            rv32i::funct3::BGEU => Ok(lhs >= rhs),
            _ => Err(Trap::IllegalInstruction(d.raw)),
        }
    }

    fn alu_imm(&self, d: &crate::isa::instruction::Decoded, inst: u32) -> Result<u32, Trap> {
        let lhs = self.regs.read(d.rs1);
        let imm = d.imm as u32;
        let shamt = imm & 0x1F;
        match d.funct3 {
            rv32i::funct3::ADD_SUB => Ok(lhs.wrapping_add(imm)),
            rv32i::funct3::SLT => Ok(u32::from((lhs as i32) < (imm as i32))),
            rv32i::funct3::SLTU => Ok(u32::from(lhs < imm)),
            rv32i::funct3::XOR => Ok(lhs ^ imm),
            rv32i::funct3::OR => Ok(lhs | imm),
            rv32i::funct3::AND => Ok(lhs & imm),
            rv32i::funct3::SLL if d.funct7 == rv32i::funct7::MAIN => Ok(lhs << shamt),
            rv32i::funct3::SRL_SRA => match d.funct7 {
                rv32i::funct7::MAIN => Ok(lhs >> shamt),
                rv32i::funct7::ALT => Ok(((lhs as i32) >> shamt) as u32),
                _ => Err(Trap::IllegalInstruction(inst)),
            },
            _ => Err(Trap::IllegalInstruction(inst)),
        }
    }

    fn alu_reg(&self, d: &crate::isa::instruction::Decoded, inst: u32) -> Result<u32, Trap> {
        let lhs = self.regs.read(d.rs1);
        let rhs = self.regs.read(d.rs2);
        let shamt = rhs & 0x1F;

        if d.funct7 == rv32i::funct7::MULDIV {
            return Self::muldiv(d.funct3, lhs, rhs, inst);
        }

        match (d.funct3, d.funct7) {
            (rv32i::funct3::ADD_SUB, rv32i::funct7::MAIN) => Ok(lhs.wrapping_add(rhs)),
            (rv32i::funct3::ADD_SUB, rv32i::funct7::ALT) => Ok(lhs.wrapping_sub(rhs)),
            (rv32i::funct3::SLL, rv32i::funct7::MAIN) => Ok(lhs << shamt),
            (rv32i::funct3::SLT, rv32i::funct7::MAIN) => Ok(u32::from((lhs as i32) < (rhs as i32))),
            (rv32i::funct3::SLTU, rv32i::funct7::MAIN) => Ok(u32::from(lhs < rhs)),
            (rv32i::funct3::XOR, rv32i::funct7::MAIN) => Ok(lhs ^ rhs),
            (rv32i::funct3::SRL_SRA, rv32i::funct7::MAIN) => Ok(lhs >> shamt),
            (rv32i::funct3::SRL_SRA, rv32i::funct7::ALT) => Ok(((lhs as i32) >> shamt) as u32),
            (rv32i::funct3::OR, rv32i::funct7::MAIN) => Ok(lhs | rhs),
            (rv32i::funct3::AND, rv32i::funct7::MAIN) => Ok(lhs & rhs),
            _ => Err(Trap::IllegalInstruction(inst)),
        }
    }

    fn muldiv(funct3: u32, lhs: u32, rhs: u32, inst: u32) -> Result<u32, Trap> {
        match funct3 {
            rv32m::funct3::MUL => Ok(lhs.wrapping_mul(rhs)),
            rv32m::funct3::MULH => {
                Ok(((i64::from(lhs as i32) * i64::from(rhs as i32)) >> 32) as u32)
            }
            rv32m::funct3::MULHSU => {
                Ok(((i64::from(lhs as i32)).wrapping_mul(u64::from(rhs) as i64) >> 32) as u32)
            }
            rv32m::funct3::MULHU => Ok(((u64::from(lhs) * u64::from(rhs)) >> 32) as u32),
            rv32m::funct3::DIV => {
                let (a, b) = (lhs as i32, rhs as i32);
                if b == 0 {
                    Ok(u32::MAX)
                } else if a == i32::MIN && b == -1 {
                    Ok(a as u32)
                } else {
                    Ok(a.wrapping_div(b) as u32)
                }
            }
            rv32m::funct3::DIVU => {
                if rhs == 0 {
                    Ok(u32::MAX)
                } else {
                    Ok(lhs / rhs)
                }
            }
            rv32m::funct3::REM => {
                let (a, b) = (lhs as i32, rhs as i32);
                if b == 0 {
                    Ok(a as u32)
                } else if a == i32::MIN && b == -1 {
                    Ok(0)
                } else {
                    Ok(a.wrapping_rem(b) as u32)
                }
            }
            rv32m::funct3::REMU => {
                if rhs == 0 {
                    Ok(lhs)
                } else {
                    Ok(lhs % rhs)
                }
            }
            _ => Err(Trap::IllegalInstruction(inst)),
        }
    }

    /// SYSTEM opcode: CSR accesses plus the privileged control instructions.
    fn exec_system(
        &mut self,
        inst: u32,
        d: &crate::isa::instruction::Decoded,
    ) -> Result<Option<StopReason>, Trap> {
        let next_pc = self.pc.wrapping_add(INSTRUCTION_SIZE);

        if d.funct3 == 0 {
            return match inst {
                privileged::opcodes::ECALL => Err(Trap::EnvironmentCallFromMMode),
                privileged::opcodes::EBREAK => {
                    if self.exit_on_ebreak {
                        Ok(Some(StopReason::Breakpoint))
                    } else {
                        Err(Trap::Breakpoint(self.pc))
                    }
                }
                privileged::opcodes::MPAUSE => Ok(Some(StopReason::Halt)),
                privileged::opcodes::MRET => {
                    self.trap_return();
                    Ok(None)
                }
                privileged::opcodes::WFI => {
                    // No interrupt sources to wait on, so wfi retires
                    // immediately.
                    self.pc = next_pc;
                    Ok(None)
                }
                _ => Err(Trap::IllegalInstruction(inst)),
            };
        }

        let addr = inst.csr();
        let writes = match d.funct3 {
            privileged::opcodes::CSRRW | privileged::opcodes::CSRRWI => true,
            privileged::opcodes::CSRRS
            | privileged::opcodes::CSRRC
            | privileged::opcodes::CSRRSI
            | privileged::opcodes::CSRRCI => d.rs1 != 0,
            _ => return Err(Trap::IllegalInstruction(inst)),
        };
        if writes && csr::is_read_only(addr) {
            return Err(Trap::IllegalInstruction(inst));
        }

        let old = self.csr_read(addr);
        let operand = match d.funct3 {
            privileged::opcodes::CSRRW | privileged::opcodes::CSRRS | privileged::opcodes::CSRRC => {
                self.regs.read(d.rs1)
            }
            _ => d.rs1 as u32,
        };

        if writes {
            let new = match d.funct3 {
                privileged::opcodes::CSRRW | privileged::opcodes::CSRRWI => operand,
                privileged::opcodes::CSRRS | privileged::opcodes::CSRRSI => old | operand,
                _ => old & !operand,
            };
            self.csr_write(addr, new);
        }

        self.regs.write(d.rd, old);
        self.pc = next_pc;
        Ok(None)
    }
}
