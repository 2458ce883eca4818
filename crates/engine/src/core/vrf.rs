//! Vector register file.
//!
//! 32 vector registers of VLEN = 128 bits each, stored as raw little-endian
//! bytes. Elements are addressed by selected element width (SEW) of 8, 16,
//! or 32 bits; `v0` doubles as the mask register.

use crate::common::constants::VLEN_BYTES;

/// Vector register file: 32 registers of `VLEN_BYTES` bytes each.
#[derive(Debug)]
pub struct VectorRegFile {
    data: [[u8; VLEN_BYTES]; 32],
}

impl VectorRegFile {
    /// Creates a vector register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self {
            data: [[0; VLEN_BYTES]; 32],
        }
    }

    /// Resets all registers to zero.
    pub fn reset(&mut self) {
        self.data = [[0; VLEN_BYTES]; 32];
    }

    /// Reads element `idx` of register `reg` at the given SEW (8/16/32 bits).
    pub fn read_elem(&self, reg: usize, sew: u32, idx: usize) -> u32 {
        let off = idx * (sew as usize / 8);
        let b = &self.data[reg];
        match sew {
            8 => u32::from(b[off]),
            16 => u32::from(u16::from_le_bytes([b[off], b[off + 1]])),
            32 => u32::from_le_bytes([b[off], b[off + 1], b[off + 2], b[off + 3]]),
            _ => 0,
        }
    }

    /// Writes element `idx` of register `reg` at the given SEW (8/16/32 bits).
    pub fn write_elem(&mut self, reg: usize, sew: u32, idx: usize, val: u32) {
        let off = idx * (sew as usize / 8);
        let b = &mut self.data[reg];
        match sew {
            8 => b[off] = val as u8,
            16 => b[off..off + 2].copy_from_slice(&(val as u16).to_le_bytes()),
            32 => b[off..off + 4].copy_from_slice(&val.to_le_bytes()),
            _ => {}
        }
    }

    /// Raw little-endian bytes of register `reg`.
    pub fn bytes(&self, reg: usize) -> &[u8; VLEN_BYTES] {
        &self.data[reg]
    }

    /// Overwrites the raw bytes of register `reg`.
    pub fn set_bytes(&mut self, reg: usize, bytes: &[u8; VLEN_BYTES]) {
        self.data[reg] = *bytes;
    }

    /// Mask bit for element `idx` in `v0`.
    pub fn mask_bit(&self, idx: usize) -> bool {
        (self.data[0][idx / 8] >> (idx % 8)) & 1 != 0
    }
}

impl Default for VectorRegFile {
    fn default() -> Self {
        Self::new()
    }
}
