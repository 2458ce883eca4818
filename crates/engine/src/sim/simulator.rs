//! The execution controller.
//!
//! This module owns the core and mediates every host-facing operation:
//! 1. **Lifecycle:** Program load, asynchronous run, blocking wait, and
//!    bounded stepping, tracked by an explicit state machine.
//! 2. **Inspection:** Register reads/writes by canonical name and
//!    check-free debug memory access, available whenever the engine is not
//!    running.
//! 3. **Accounting:** The cycle counter, reset on every load and readable
//!    in any state.
//!
//! While a run is in flight the core lives on the worker thread; operations
//! that need it fail with an invalid-state error instead of blocking.

use std::fmt;
use std::path::Path;
use std::thread::{self, JoinHandle};

use tracing::info;

use crate::common::SimulatorError;
use crate::common::constants::VLEN_BYTES;
use crate::config::SimulatorOptions;
use crate::core::{Core, StopReason, csr};
use crate::isa::abi;
use crate::sim::loader::{self, ProgramImage};

/// Where the controller is in the execution lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionState {
    /// A program may be loaded or stepped; nothing is in flight.
    Idle,
    /// The engine is executing on a worker thread.
    Running,
    /// The engine is executing a bounded number of steps on the caller's
    /// thread.
    Stepping,
    /// Execution stopped cleanly (`mpause`, or `ebreak` with exit-on-ebreak).
    Halted,
    /// Execution stopped because the trap handler itself faulted. Terminal
    /// until the next load.
    Faulted,
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Stepping => "stepping",
            Self::Halted => "halted",
            Self::Faulted => "faulted",
        };
        write!(f, "{name}")
    }
}

/// The top-level simulator: a core plus the execution-control state machine.
///
/// The core is moved onto a worker thread for the duration of a
/// [`run`](Simulator::run) and moved back by [`wait`](Simulator::wait);
/// there is exactly one core and no shared mutable state between threads.
#[derive(Debug)]
pub struct Simulator {
    core: Option<Core>,
    handle: Option<JoinHandle<(Core, StopReason)>>,
    state: ExecutionState,
    loaded: bool,
    /// Last cycle count observed while the core was accessible.
    cycles: u64,
}

impl Simulator {
    /// Creates a simulator from the given options.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::LoadFailure`] when the options describe an
    /// invalid memory layout (zero-length or overlapping regions).
    pub fn new(options: &SimulatorOptions) -> Result<Self, SimulatorError> {
        options.validate()?;
        Ok(Self {
            core: Some(Core::new(options)),
            handle: None,
            state: ExecutionState::Idle,
            loaded: false,
            cycles: 0,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ExecutionState {
        self.state
    }

    /// Cycles consumed since the last program load.
    ///
    /// Always available; while the engine is running this reports the count
    /// observed when the run started.
    pub fn cycle_count(&self) -> u64 {
        match &self.core {
            Some(core) => core.cycles,
            None => self.cycles,
        }
    }

    /// Loads an RV32 ELF executable from disk and prepares it for execution.
    ///
    /// `entry` overrides the entry point declared by the image when given.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::LoadFailure`] when the file is unreadable,
    /// malformed, or does not fit in memory, and
    /// [`SimulatorError::InvalidStateTransition`] while the engine is
    /// running.
    pub fn load_program<P: AsRef<Path>>(
        &mut self,
        path: P,
        entry: Option<u32>,
    ) -> Result<(), SimulatorError> {
        let image = loader::load_elf_file(path)?;
        self.load_image(image, entry)
    }

    /// Places a parsed program into memory and resets the core.
    ///
    /// All architectural state is reset: registers and memory are zeroed,
    /// the cycle counter restarts, and the program counter is set to the
    /// image entry point (or to `entry` when given). Loading is permitted
    /// from any state except while the engine is running, so a halted or
    /// faulted simulator can be reused.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::LoadFailure`] when a segment falls outside
    /// backed memory or the entry point lies outside instruction memory, and
    /// [`SimulatorError::InvalidStateTransition`] while the engine is
    /// running.
    pub fn load_image(
        &mut self,
        mut image: ProgramImage,
        entry: Option<u32>,
    ) -> Result<(), SimulatorError> {
        if self.handle.is_some() {
            return Err(SimulatorError::InvalidStateTransition(
                "cannot load a program while the engine is running".into(),
            ));
        }
        if let Some(entry) = entry {
            image.entry = entry;
        }
        let core = self.core_mut()?;
        let itcm_start = core.mem.itcm_start();
        let itcm_end = u64::from(itcm_start) + u64::from(core.mem.itcm_length());
        if u64::from(image.entry) < u64::from(itcm_start) || u64::from(image.entry) >= itcm_end {
            return Err(SimulatorError::LoadFailure(format!(
                "entry point {:#010x} lies outside instruction memory",
                image.entry
            )));
        }
        core.reset(image.entry);

        for segment in &image.segments {
            let written = core.mem.debug_write(u64::from(segment.address), &segment.data);
            match written {
                Ok(n) if n == segment.data.len() => {}
                _ => {
                    return Err(SimulatorError::LoadFailure(format!(
                        "segment at {:#010x} ({} bytes) does not fit in memory",
                        segment.address,
                        segment.data.len()
                    )));
                }
            }
        }

        info!(
            entry = format_args!("{:#010x}", image.entry),
            segments = image.segments.len(),
            "program loaded"
        );
        self.cycles = 0;
        self.loaded = true;
        self.state = ExecutionState::Idle;
        Ok(())
    }

    /// Starts executing the loaded program on a worker thread.
    ///
    /// Returns immediately; use [`wait`](Simulator::wait) to block until the
    /// program stops.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::InvalidStateTransition`] when no program is
    /// loaded or the simulator is not idle.
    pub fn run(&mut self) -> Result<(), SimulatorError> {
        if self.state != ExecutionState::Idle || !self.loaded {
            return Err(SimulatorError::InvalidStateTransition(format!(
                "cannot run from the {} state without a loaded program",
                self.state
            )));
        }
        let mut core = self.core_take()?;
        self.cycles = core.cycles;

        info!(pc = format_args!("{:#010x}", core.pc), "run started");
        self.handle = Some(thread::spawn(move || {
            let reason = core.run_to_stop();
            (core, reason)
        }));
        self.state = ExecutionState::Running;
        Ok(())
    }

    /// Blocks until the running program stops and reports the final state.
    ///
    /// Consumes the in-flight run: a second `wait` without an intervening
    /// [`run`](Simulator::run) is an error.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::InvalidStateTransition`] when no run is in
    /// flight, and [`SimulatorError::EnginePanicked`] when the worker thread
    /// died; the latter leaves the simulator faulted and unusable until the
    /// next load.
    pub fn wait(&mut self) -> Result<ExecutionState, SimulatorError> {
        let handle = self.handle.take().ok_or_else(|| {
            SimulatorError::InvalidStateTransition(format!(
                "cannot wait in the {} state, no run is in flight",
                self.state
            ))
        })?;

        match handle.join() {
            Ok((core, reason)) => {
                self.cycles = core.cycles;
                self.core = Some(core);
                self.state = match reason {
                    StopReason::Halt | StopReason::Breakpoint => ExecutionState::Halted,
                    StopReason::DoubleFault => ExecutionState::Faulted,
                };
                info!(reason = ?reason, cycles = self.cycles, "run finished");
                Ok(self.state)
            }
            Err(_) => {
                self.state = ExecutionState::Faulted;
                self.loaded = false;
                Err(SimulatorError::EnginePanicked)
            }
        }
    }

    /// Executes at most `n` instructions on the caller's thread.
    ///
    /// Stops early when the program halts or faults, in which case fewer
    /// than `n` cycles are consumed. Stepping a halted or faulted simulator
    /// consumes nothing and returns zero.
    ///
    /// # Returns
    ///
    /// The number of cycles actually consumed.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::InvalidStateTransition`] while the engine
    /// is running, or when no program has been loaded.
    pub fn step(&mut self, n: u64) -> Result<u64, SimulatorError> {
        match self.state {
            ExecutionState::Halted | ExecutionState::Faulted => return Ok(0),
            ExecutionState::Idle => {}
            _ => {
                return Err(SimulatorError::InvalidStateTransition(format!(
                    "cannot step in the {} state",
                    self.state
                )));
            }
        }
        if !self.loaded {
            return Err(SimulatorError::InvalidStateTransition(
                "cannot step without a loaded program".into(),
            ));
        }

        self.state = ExecutionState::Stepping;
        let core = self.core_mut()?;
        let mut consumed = 0;
        let mut stopped = None;
        while consumed < n {
            consumed += 1;
            if let Some(reason) = core.step() {
                stopped = Some(reason);
                break;
            }
        }
        self.cycles = self.core_ref()?.cycles;
        self.state = match stopped {
            None => ExecutionState::Idle,
            Some(StopReason::Halt | StopReason::Breakpoint) => ExecutionState::Halted,
            Some(StopReason::DoubleFault) => ExecutionState::Faulted,
        };
        Ok(consumed)
    }

    /// Reads a register by canonical name.
    ///
    /// Accepts the program counter (`pc`), integer registers by index (`x5`)
    /// or ABI name (`t0`, `fp`), and implemented CSRs by name (`mcause`,
    /// `vl`).
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::UnknownRegister`] for an unrecognized name,
    /// and [`SimulatorError::InvalidStateTransition`] while the engine is
    /// running.
    pub fn read_register(&self, name: &str) -> Result<u64, SimulatorError> {
        let core = self.core_ref()?;
        if name == "pc" {
            return Ok(u64::from(core.pc));
        }
        if let Some(idx) = gpr_index(name) {
            return Ok(u64::from(core.regs.read(idx)));
        }
        if let Some(addr) = csr_address(name) {
            return Ok(u64::from(core.csr_read(addr)));
        }
        Err(SimulatorError::UnknownRegister(name.to_string()))
    }

    /// Writes a register by canonical name.
    ///
    /// CSR writes go through the architectural WARL masking, so hardwired
    /// fields keep their values.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::UnknownRegister`] for an unrecognized name,
    /// and [`SimulatorError::InvalidStateTransition`] while the engine is
    /// running.
    pub fn write_register(&mut self, name: &str, value: u64) -> Result<(), SimulatorError> {
        let core = self.core_mut()?;
        let value = value as u32;
        if name == "pc" {
            core.pc = value;
            return Ok(());
        }
        if let Some(idx) = gpr_index(name) {
            core.regs.write(idx, value);
            return Ok(());
        }
        if let Some(addr) = csr_address(name) {
            core.csr_write(addr, value);
            return Ok(());
        }
        Err(SimulatorError::UnknownRegister(name.to_string()))
    }

    /// Raw little-endian contents of vector register `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::UnknownRegister`] for an index outside
    /// `0..32`, and [`SimulatorError::InvalidStateTransition`] while the
    /// engine is running.
    pub fn read_vector_register(&self, index: usize) -> Result<[u8; VLEN_BYTES], SimulatorError> {
        if index >= 32 {
            return Err(SimulatorError::UnknownRegister(format!("v{index}")));
        }
        Ok(*self.core_ref()?.vregs.bytes(index))
    }

    /// Reads memory without permission checks, for host-side inspection.
    ///
    /// Transfers as many bytes as are backed starting at `address` and
    /// reports how many were read; the transfer stops at the first unbacked
    /// byte.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::MemoryRangeExceeded`] when not even the
    /// first byte is backed, and
    /// [`SimulatorError::InvalidStateTransition`] while the engine is
    /// running.
    pub fn read_memory(&self, address: u64, buf: &mut [u8]) -> Result<usize, SimulatorError> {
        self.core_ref()?.mem.debug_read(address, buf)
    }

    /// Writes memory without permission checks, for host-side injection.
    ///
    /// The counterpart of [`read_memory`](Simulator::read_memory); reports
    /// how many bytes were written.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::MemoryRangeExceeded`] when not even the
    /// first byte is backed, and
    /// [`SimulatorError::InvalidStateTransition`] while the engine is
    /// running.
    pub fn write_memory(&mut self, address: u64, data: &[u8]) -> Result<usize, SimulatorError> {
        self.core_mut()?.mem.debug_write(address, data)
    }

    fn core_ref(&self) -> Result<&Core, SimulatorError> {
        self.core.as_ref().ok_or_else(Self::core_unavailable)
    }

    fn core_mut(&mut self) -> Result<&mut Core, SimulatorError> {
        self.core.as_mut().ok_or_else(Self::core_unavailable)
    }

    fn core_take(&mut self) -> Result<Core, SimulatorError> {
        self.core.take().ok_or_else(Self::core_unavailable)
    }

    fn core_unavailable() -> SimulatorError {
        SimulatorError::InvalidStateTransition(
            "core state is unavailable while the engine is running".into(),
        )
    }
}

/// Resolves an integer register name (`x5`, `t0`, `fp`) to its index.
fn gpr_index(name: &str) -> Option<usize> {
    if let Some(rest) = name.strip_prefix('x') {
        return rest.parse().ok().filter(|&i| i < 32);
    }
    if name == "fp" {
        return Some(8);
    }
    abi::NAMES.iter().position(|&n| n == name)
}

/// Resolves a CSR name to its address.
fn csr_address(name: &str) -> Option<u32> {
    let addr = match name {
        "mstatus" => csr::MSTATUS,
        "misa" => csr::MISA,
        "mie" => csr::MIE,
        "mtvec" => csr::MTVEC,
        "mscratch" => csr::MSCRATCH,
        "mepc" => csr::MEPC,
        "mcause" => csr::MCAUSE,
        "mtval" => csr::MTVAL,
        "mip" => csr::MIP,
        "mcycle" => csr::MCYCLE,
        "minstret" => csr::MINSTRET,
        "mhartid" => csr::MHARTID,
        "cycle" => csr::CYCLE,
        "instret" => csr::INSTRET,
        "vstart" => csr::VSTART,
        "vxsat" => csr::VXSAT,
        "vxrm" => csr::VXRM,
        "vcsr" => csr::VCSR,
        "vl" => csr::VL,
        "vtype" => csr::VTYPE,
        "vlenb" => csr::VLENB,
        _ => return None,
    };
    Some(addr)
}
