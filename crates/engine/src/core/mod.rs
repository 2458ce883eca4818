//! The processor core.
//!
//! This module ties the architectural state together and drives execution:
//! 1. **State:** General-purpose, vector, and control registers plus the
//!    program counter.
//! 2. **Step Loop:** Fetch, execute, and trap entry for one instruction per
//!    cycle.
//! 3. **Stop Conditions:** Clean halts, breakpoints, and unrecoverable
//!    double faults.

pub mod csr;
pub mod execute;
pub mod gpr;
pub mod trap;
pub mod vector;
pub mod vrf;

use tracing::trace;

use crate::common::Trap;
use crate::common::constants::INSTRUCTION_SIZE;
use crate::config::SimulatorOptions;
use crate::core::csr::Csrs;
use crate::core::gpr::Gpr;
use crate::core::vrf::VectorRegFile;
use crate::mem::Memory;

/// Why the core stopped executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// A clean halt was requested (`mpause`).
    Halt,
    /// An `ebreak` retired with exit-on-ebreak enabled.
    Breakpoint,
    /// A trap was raised by the handler entry instruction itself; execution
    /// cannot make progress.
    DoubleFault,
}

/// A single in-order core with scalar and vector register state, memory, and
/// a cycle counter.
#[derive(Debug)]
pub struct Core {
    /// General-purpose registers.
    pub regs: Gpr,
    /// Vector registers.
    pub vregs: VectorRegFile,
    /// Control and status registers.
    pub csrs: Csrs,
    /// Program counter.
    pub pc: u32,
    /// Instruction and data memory.
    pub mem: Memory,
    /// Cycles consumed since the last program load.
    pub cycles: u64,
    /// When set, a retired `ebreak` stops execution instead of trapping.
    pub exit_on_ebreak: bool,
    misa_reset: u32,
}

impl Core {
    /// Creates a core from validated simulator options.
    pub fn new(options: &SimulatorOptions) -> Self {
        let mut core = Self {
            regs: Gpr::new(),
            vregs: VectorRegFile::new(),
            csrs: Csrs::default(),
            pc: options.itcm_start_address,
            mem: Memory::new(options),
            cycles: 0,
            exit_on_ebreak: options.exit_on_ebreak,
            misa_reset: options.initial_misa_value,
        };
        core.csrs.misa = options.initial_misa_value;
        core
    }

    /// Resets all architectural state and zeroes memory, then points the
    /// program counter at `entry`.
    pub fn reset(&mut self, entry: u32) {
        self.regs.reset();
        self.vregs.reset();
        self.csrs = Csrs::default();
        self.csrs.misa = self.misa_reset;
        self.mem.reset();
        self.pc = entry;
        self.cycles = 0;
    }

    /// Fetches the instruction at the current program counter.
    ///
    /// # Errors
    ///
    /// Returns [`Trap::InstructionAddressMisaligned`] for a program counter
    /// that is not 4-byte aligned, or [`Trap::InstructionAccessFault`] when
    /// the fetch falls outside instruction memory.
    pub fn fetch(&self) -> Result<u32, Trap> {
        if self.pc % INSTRUCTION_SIZE != 0 {
            return Err(Trap::InstructionAddressMisaligned(self.pc));
        }
        self.mem.fetch_u32(self.pc)
    }

    /// Runs one cycle: fetch, execute, and (on a fault) trap entry.
    ///
    /// Each call consumes exactly one cycle, whether the instruction retires
    /// or a trap is taken.
    ///
    /// # Returns
    ///
    /// The stop reason when this cycle ended execution, or `None` when the
    /// core can continue.
    pub fn step(&mut self) -> Option<StopReason> {
        self.cycles += 1;
        let epc = self.pc;

        let result = self.fetch().and_then(|inst| {
            trace!(
                pc = format_args!("{epc:#010x}"),
                inst = format_args!("{inst:#010x}"),
                "execute"
            );
            self.execute(inst)
        });

        match result {
            Ok(stop) => stop,
            Err(trap) => self.enter_trap(&trap, epc),
        }
    }

    /// Runs until a stop condition is reached.
    pub fn run_to_stop(&mut self) -> StopReason {
        loop {
            if let Some(reason) = self.step() {
                return reason;
            }
        }
    }
}
