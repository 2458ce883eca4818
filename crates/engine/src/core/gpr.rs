//! General-purpose register file.
//!
//! 32 integer registers (`x0`-`x31`) with `x0` hardwired to zero.

/// General-purpose register file.
#[derive(Debug)]
pub struct Gpr {
    regs: [u32; 32],
}

impl Gpr {
    /// Creates a register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self { regs: [0; 32] }
    }

    /// Reads a register value. Register `x0` always returns 0.
    pub fn read(&self, idx: usize) -> u32 {
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes a register value. Writes to `x0` are ignored.
    pub fn write(&mut self, idx: usize, val: u32) {
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    /// Resets all registers to zero.
    pub fn reset(&mut self) {
        self.regs = [0; 32];
    }
}

impl Default for Gpr {
    fn default() -> Self {
        Self::new()
    }
}
