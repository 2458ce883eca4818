//! Synchronous trap entry.
//!
//! All implemented traps are machine-mode synchronous exceptions. Entering a
//! trap latches the architectural cause state and redirects the program
//! counter to the handler base in `mtvec`; the handler is responsible for
//! adjusting `mepc` before `mret` if it wants to skip the faulting
//! instruction.

use tracing::debug;

use super::{Core, StopReason};
use crate::common::Trap;

impl Core {
    /// Takes a synchronous trap raised by the instruction at `epc`.
    ///
    /// Latches `mtval`, `mepc`, and `mcause`, clears `vstart`, and redirects
    /// the program counter to the handler base (`mtvec` with the mode bits
    /// masked off).
    ///
    /// # Returns
    ///
    /// `Some(StopReason::DoubleFault)` when the faulting instruction is the
    /// handler entry itself, in which case redirecting would loop forever and
    /// the core must stop instead. `None` when the trap was taken normally.
    pub fn enter_trap(&mut self, trap: &Trap, epc: u32) -> Option<StopReason> {
        let handler = self.csrs.mtvec & !0b11;

        self.csrs.mtval = trap.value();
        self.csrs.mepc = epc;
        self.csrs.mcause = trap.cause();
        self.csrs.vstart = 0;

        debug!(
            cause = self.csrs.mcause,
            mtval = format_args!("{:#010x}", self.csrs.mtval),
            epc = format_args!("{epc:#010x}"),
            "trap taken"
        );

        if epc == handler {
            return Some(StopReason::DoubleFault);
        }

        self.pc = handler;
        None
    }

    /// Returns from the current trap handler: jumps to `mepc`.
    pub fn trap_return(&mut self) {
        self.pc = self.csrs.mepc & !1;
    }
}
