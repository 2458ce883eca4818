//! Configuration for the simulator.
//!
//! This module defines the option structures used to parameterize a simulator
//! instance. It provides:
//! 1. **Defaults:** Baseline memory geometry and ISA configuration.
//! 2. **Structures:** `SimulatorOptions` and `LsuAccessRange`.
//! 3. **Validation:** Region-geometry checks performed once at construction.
//!
//! Options are supplied via JSON (the CLI deserializes them with serde) or use
//! `SimulatorOptions::default()`. They are immutable after construction.

use serde::Deserialize;

use crate::common::error::SimulatorError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Base address of the tightly-coupled instruction memory.
    pub const ITCM_START: u32 = 0x0000_0000;

    /// Length of the tightly-coupled instruction memory (512 KiB).
    pub const ITCM_LENGTH: u32 = 512 * 1024;

    /// Base address of the default data window (512 KiB above ITCM).
    pub const DTCM_START: u32 = 0x0008_0000;

    /// Length of the default data window (512 KiB).
    pub const DTCM_LENGTH: u32 = 512 * 1024;

    /// Reset value of the machine ISA register: RV32 base with I, M, and V.
    ///
    /// Bit 30 encodes MXL=1 (32-bit); bits 8, 12, and 21 encode the I, M,
    /// and V extensions.
    pub const MISA_RV32IMV: u32 = (1 << 30) | (1 << 8) | (1 << 12) | (1 << 21);
}

/// A contiguous byte-addressed window in which instruction-issued loads and
/// stores are permitted.
///
/// Each configured range carries its own backing storage. Instruction fetches
/// are never satisfied from an access range, only from the ITCM.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct LsuAccessRange {
    /// First byte address covered by the window.
    pub start_address: u32,
    /// Window length in bytes.
    pub length: u32,
}

impl LsuAccessRange {
    /// Exclusive end address of the window, widened to avoid u32 overflow.
    pub(crate) fn end(&self) -> u64 {
        u64::from(self.start_address) + u64::from(self.length)
    }

    /// Returns `true` if the two windows share at least one byte.
    pub(crate) fn overlaps(&self, other: &Self) -> bool {
        u64::from(self.start_address) < other.end() && u64::from(other.start_address) < self.end()
    }
}

/// Simulator construction options.
///
/// Immutable after a `Simulator` is built from them. Region-geometry
/// invariants (non-zero lengths, 32-bit address-space fit, mutual
/// non-overlap) are enforced by [`SimulatorOptions::validate`].
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulatorOptions {
    /// Base address of the instruction memory region.
    pub itcm_start_address: u32,
    /// Length of the instruction memory region in bytes.
    pub itcm_length: u32,
    /// Reset value of the machine ISA CSR.
    pub initial_misa_value: u32,
    /// Data-access windows, checked in configured order.
    pub lsu_access_ranges: Vec<LsuAccessRange>,
    /// When set, an `ebreak` stops execution instead of raising a trap.
    pub exit_on_ebreak: bool,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        Self {
            itcm_start_address: defaults::ITCM_START,
            itcm_length: defaults::ITCM_LENGTH,
            initial_misa_value: defaults::MISA_RV32IMV,
            lsu_access_ranges: vec![LsuAccessRange {
                start_address: defaults::DTCM_START,
                length: defaults::DTCM_LENGTH,
            }],
            exit_on_ebreak: true,
        }
    }
}

impl SimulatorOptions {
    /// Checks the region geometry.
    ///
    /// Every region (ITCM and each LSU access range) must have a non-zero
    /// length, fit the 32-bit address space, and be disjoint from every other
    /// region. Disjointness keeps containment lookups deterministic: the ITCM
    /// is consulted first, then the access ranges in configured order.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::LoadFailure`] describing the first violated
    /// constraint.
    pub fn validate(&self) -> Result<(), SimulatorError> {
        let itcm = LsuAccessRange {
            start_address: self.itcm_start_address,
            length: self.itcm_length,
        };

        let mut regions = vec![("itcm", itcm)];
        for (i, range) in self.lsu_access_ranges.iter().enumerate() {
            if range.length == 0 {
                return Err(SimulatorError::LoadFailure(format!(
                    "lsu access range {i} has zero length"
                )));
            }
            if range.end() > u64::from(u32::MAX) + 1 {
                return Err(SimulatorError::LoadFailure(format!(
                    "lsu access range {i} at {:#x}+{:#x} exceeds the 32-bit address space",
                    range.start_address, range.length
                )));
            }
            regions.push(("lsu", *range));
        }

        if self.itcm_length == 0 {
            return Err(SimulatorError::LoadFailure(
                "itcm length must be non-zero".into(),
            ));
        }
        if itcm.end() > u64::from(u32::MAX) + 1 {
            return Err(SimulatorError::LoadFailure(format!(
                "itcm at {:#x}+{:#x} exceeds the 32-bit address space",
                self.itcm_start_address, self.itcm_length
            )));
        }

        for (i, (_, a)) in regions.iter().enumerate() {
            for (name, b) in regions.iter().skip(i + 1) {
                if a.overlaps(b) {
                    return Err(SimulatorError::LoadFailure(format!(
                        "{name} region at {:#x}+{:#x} overlaps region at {:#x}+{:#x}",
                        b.start_address, b.length, a.start_address, a.length
                    )));
                }
            }
        }

        Ok(())
    }
}
