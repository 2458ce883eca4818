//! Control and Status Register (CSR) definitions and access logic.
//!
//! This module provides:
//! 1. **Address Definitions:** Constants for the implemented machine and
//!    vector CSRs.
//! 2. **Register Storage:** The `Csrs` struct holding architectural state.
//! 3. **Access Logic:** `Core::csr_read` / `Core::csr_write`, including WARL
//!    behavior and counter aliasing.
//!
//! Read-only addresses (top two address bits set, `0xC00..=0xFFF`) are a
//! property of the address encoding; write attempts there are rejected by the
//! execution engine as illegal instructions before reaching `csr_write`.

use super::Core;
use crate::common::constants::VLEN_BYTES;

/// Vector start element CSR address.
pub const VSTART: u32 = 0x008;
/// Fixed-point saturation flag CSR address.
pub const VXSAT: u32 = 0x009;
/// Fixed-point rounding mode CSR address.
pub const VXRM: u32 = 0x00A;
/// Combined vector control/status CSR address.
pub const VCSR: u32 = 0x00F;

/// Machine status register CSR address.
pub const MSTATUS: u32 = 0x300;
/// Machine ISA register CSR address.
pub const MISA: u32 = 0x301;
/// Machine interrupt enable register CSR address.
pub const MIE: u32 = 0x304;
/// Machine trap vector base address register CSR address.
pub const MTVEC: u32 = 0x305;
/// Machine scratch register CSR address.
pub const MSCRATCH: u32 = 0x340;
/// Machine exception program counter CSR address.
pub const MEPC: u32 = 0x341;
/// Machine cause register CSR address.
pub const MCAUSE: u32 = 0x342;
/// Machine trap value register CSR address.
pub const MTVAL: u32 = 0x343;
/// Machine interrupt pending register CSR address.
pub const MIP: u32 = 0x344;

/// Machine cycle counter CSR address (low half).
pub const MCYCLE: u32 = 0xB00;
/// Machine instructions-retired counter CSR address (low half).
pub const MINSTRET: u32 = 0xB02;
/// Machine cycle counter CSR address (high half).
pub const MCYCLEH: u32 = 0xB80;
/// Machine instructions-retired counter CSR address (high half).
pub const MINSTRETH: u32 = 0xB82;

/// Cycle counter CSR address (read-only alias, low half).
pub const CYCLE: u32 = 0xC00;
/// Instructions-retired counter CSR address (read-only alias, low half).
pub const INSTRET: u32 = 0xC02;
/// Cycle counter CSR address (read-only alias, high half).
pub const CYCLEH: u32 = 0xC80;
/// Instructions-retired counter CSR address (read-only alias, high half).
pub const INSTRETH: u32 = 0xC82;

/// Vector length CSR address (read-only).
pub const VL: u32 = 0xC20;
/// Vector type CSR address (read-only).
pub const VTYPE: u32 = 0xC21;
/// Vector register length-in-bytes CSR address (read-only).
pub const VLENB: u32 = 0xC22;

/// Machine vendor ID CSR address (read-only).
pub const MVENDORID: u32 = 0xF11;
/// Machine architecture ID CSR address (read-only).
pub const MARCHID: u32 = 0xF12;
/// Machine implementation ID CSR address (read-only).
pub const MIMPID: u32 = 0xF13;
/// Machine hardware thread ID CSR address (read-only).
pub const MHARTID: u32 = 0xF14;

/// Returns `true` if the CSR address is architecturally read-only.
///
/// Bits [11:10] of the address encode accessibility; `0b11` marks the
/// read-only space.
pub fn is_read_only(addr: u32) -> bool {
    (addr >> 10) & 0b11 == 0b11
}

/// Architectural control and status register state.
#[derive(Clone, Debug, Default)]
pub struct Csrs {
    /// Machine status.
    pub mstatus: u32,
    /// Machine ISA (WARL; writes are ignored, extensions are hardwired).
    pub misa: u32,
    /// Machine interrupt enable.
    pub mie: u32,
    /// Machine trap vector base address.
    pub mtvec: u32,
    /// Machine scratch.
    pub mscratch: u32,
    /// Machine exception program counter.
    pub mepc: u32,
    /// Machine trap cause.
    pub mcause: u32,
    /// Machine trap value (faulting address or offending encoding).
    pub mtval: u32,
    /// Machine interrupt pending.
    pub mip: u32,
    /// Vector start element index.
    pub vstart: u32,
    /// Fixed-point saturation flag.
    pub vxsat: u32,
    /// Fixed-point rounding mode.
    pub vxrm: u32,
    /// Current vector length.
    pub vl: u32,
    /// Current vector type (raw encoding; bit 31 is vill).
    pub vtype: u32,
}

impl Core {
    /// Reads a CSR by address. Unimplemented addresses read as zero.
    pub fn csr_read(&self, addr: u32) -> u32 {
        match addr {
            VSTART => self.csrs.vstart,
            VXSAT => self.csrs.vxsat & 1,
            VXRM => self.csrs.vxrm & 0b11,
            VCSR => ((self.csrs.vxrm & 0b11) << 1) | (self.csrs.vxsat & 1),
            MSTATUS => self.csrs.mstatus,
            MISA => self.csrs.misa,
            MIE => self.csrs.mie,
            MTVEC => self.csrs.mtvec,
            MSCRATCH => self.csrs.mscratch,
            MEPC => self.csrs.mepc,
            MCAUSE => self.csrs.mcause,
            MTVAL => self.csrs.mtval,
            MIP => self.csrs.mip,
            MVENDORID | MARCHID | MIMPID | MHARTID => 0,
            CYCLE | MCYCLE | INSTRET | MINSTRET => self.cycles as u32,
            CYCLEH | MCYCLEH | INSTRETH | MINSTRETH => (self.cycles >> 32) as u32,
            VL => self.csrs.vl,
            VTYPE => self.csrs.vtype,
            VLENB => VLEN_BYTES as u32,
            _ => 0,
        }
    }

    /// Writes a CSR by address.
    ///
    /// WARL fields are masked; `misa` writes are ignored (extensions are
    /// hardwired); unimplemented writable addresses are ignored. Callers must
    /// reject read-only addresses before invoking this.
    pub fn csr_write(&mut self, addr: u32, val: u32) {
        match addr {
            VSTART => self.csrs.vstart = val,
            VXSAT => self.csrs.vxsat = val & 1,
            VXRM => self.csrs.vxrm = val & 0b11,
            VCSR => {
                self.csrs.vxsat = val & 1;
                self.csrs.vxrm = (val >> 1) & 0b11;
            }
            MSTATUS => self.csrs.mstatus = val,
            MISA => {
                // WARL: extensions are hardwired, writes are silently ignored.
            }
            MIE => self.csrs.mie = val,
            MTVEC => self.csrs.mtvec = val,
            MSCRATCH => self.csrs.mscratch = val,
            MEPC => self.csrs.mepc = val & !1,
            MCAUSE => self.csrs.mcause = val,
            MTVAL => self.csrs.mtval = val,
            MIP => self.csrs.mip = val,
            MCYCLE | MINSTRET => {
                self.cycles = (self.cycles & 0xFFFF_FFFF_0000_0000) | u64::from(val);
            }
            MCYCLEH | MINSTRETH => {
                self.cycles = (self.cycles & 0x0000_0000_FFFF_FFFF) | (u64::from(val) << 32);
            }
            _ => {}
        }
    }
}
