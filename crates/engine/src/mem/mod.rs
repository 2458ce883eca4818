//! Memory subsystem.
//!
//! Models the fixed physical address space: a tightly-coupled instruction
//! memory (ITCM) and zero or more LSU access windows, each with its own
//! backing storage. It performs:
//! 1. **Permission Checking:** Whole-access containment checks for every
//!    instruction-issued fetch, load, and store.
//! 2. **Data Transfer:** Typed accessors used by the execution engine after a
//!    successful check.
//! 3. **Debug Path:** Check-free byte accessors for external tooling with
//!    explicit transferred-length reporting.

use crate::common::{AccessType, SimulatorError, Trap};
use crate::config::SimulatorOptions;

/// A contiguous backed region of the simulated address space.
#[derive(Clone, Debug)]
struct Region {
    start: u32,
    data: Vec<u8>,
}

impl Region {
    fn new(start: u32, length: u32) -> Self {
        Self {
            start,
            data: vec![0; length as usize],
        }
    }

    /// Exclusive end address, widened to avoid u32 overflow at the top of
    /// the address space.
    fn end(&self) -> u64 {
        u64::from(self.start) + self.data.len() as u64
    }

    /// Returns `true` if the byte span `[addr, addr + len)` lies fully
    /// inside this region.
    fn contains_span(&self, addr: u32, len: usize) -> bool {
        u64::from(addr) >= u64::from(self.start) && u64::from(addr) + len as u64 <= self.end()
    }

    fn slice(&self, addr: u32, len: usize) -> &[u8] {
        let offset = (addr - self.start) as usize;
        &self.data[offset..offset + len]
    }

    fn slice_mut(&mut self, addr: u32, len: usize) -> &mut [u8] {
        let offset = (addr - self.start) as usize;
        &mut self.data[offset..offset + len]
    }
}

/// The simulated physical address space.
///
/// Containment priority is deterministic: the ITCM is consulted first, then
/// the LSU access windows in configured order. An access that is only
/// partially covered, or that spans a boundary between regions, is rejected
/// whole; nothing is silently truncated.
#[derive(Debug)]
pub struct Memory {
    itcm: Region,
    windows: Vec<Region>,
}

impl Memory {
    /// Allocates the address space described by `options`.
    pub fn new(options: &SimulatorOptions) -> Self {
        Self {
            itcm: Region::new(options.itcm_start_address, options.itcm_length),
            windows: options
                .lsu_access_ranges
                .iter()
                .map(|r| Region::new(r.start_address, r.length))
                .collect(),
        }
    }

    /// Zeroes all backing storage. Used when a new program is installed.
    pub fn reset(&mut self) {
        self.itcm.data.fill(0);
        for window in &mut self.windows {
            window.data.fill(0);
        }
    }

    /// Base address of the instruction memory region.
    pub fn itcm_start(&self) -> u32 {
        self.itcm.start
    }

    /// Length of the instruction memory region in bytes.
    pub fn itcm_length(&self) -> u32 {
        self.itcm.data.len() as u32
    }

    /// Checks whether the byte span `[address, address + length)` is
    /// permitted for the given access type.
    ///
    /// Fetch is granted iff the span is fully inside the ITCM. Load/Store is
    /// granted iff the span is fully inside the ITCM or fully inside one LSU
    /// access window.
    ///
    /// # Errors
    ///
    /// The matching architectural access fault, carrying the access base
    /// address as the fault value.
    pub fn check(&self, address: u32, length: usize, access: AccessType) -> Result<(), Trap> {
        if self.itcm.contains_span(address, length) {
            return Ok(());
        }

        match access {
            AccessType::Fetch => Err(Trap::InstructionAccessFault(address)),
            AccessType::Read | AccessType::Write => {
                if self.windows.iter().any(|w| w.contains_span(address, length)) {
                    Ok(())
                } else if access == AccessType::Read {
                    Err(Trap::LoadAccessFault(address))
                } else {
                    Err(Trap::StoreAccessFault(address))
                }
            }
        }
    }

    /// Reads `buf.len()` bytes starting at `address` after a permission check.
    ///
    /// # Errors
    ///
    /// The architectural fault from [`Memory::check`].
    pub fn read(&self, address: u32, buf: &mut [u8], access: AccessType) -> Result<(), Trap> {
        self.check(address, buf.len(), access)?;
        let region = self.region_for(address, buf.len());
        buf.copy_from_slice(region.slice(address, buf.len()));
        Ok(())
    }

    /// Writes `data` starting at `address` after a permission check.
    ///
    /// # Errors
    ///
    /// The architectural fault from [`Memory::check`].
    pub fn write(&mut self, address: u32, data: &[u8], access: AccessType) -> Result<(), Trap> {
        self.check(address, data.len(), access)?;
        let len = data.len();
        let region = self.region_for_mut(address, len);
        region.slice_mut(address, len).copy_from_slice(data);
        Ok(())
    }

    /// Loads an 8-bit value through the LSU check.
    ///
    /// # Errors
    ///
    /// [`Trap::LoadAccessFault`] if the address is not covered.
    pub fn load_u8(&self, address: u32) -> Result<u8, Trap> {
        let mut buf = [0u8; 1];
        self.read(address, &mut buf, AccessType::Read)?;
        Ok(buf[0])
    }

    /// Loads a 16-bit little-endian value through the LSU check.
    ///
    /// # Errors
    ///
    /// [`Trap::LoadAccessFault`] if the span is not covered.
    pub fn load_u16(&self, address: u32) -> Result<u16, Trap> {
        let mut buf = [0u8; 2];
        self.read(address, &mut buf, AccessType::Read)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Loads a 32-bit little-endian value through the LSU check.
    ///
    /// # Errors
    ///
    /// [`Trap::LoadAccessFault`] if the span is not covered.
    pub fn load_u32(&self, address: u32) -> Result<u32, Trap> {
        let mut buf = [0u8; 4];
        self.read(address, &mut buf, AccessType::Read)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Stores an 8-bit value through the LSU check.
    ///
    /// # Errors
    ///
    /// [`Trap::StoreAccessFault`] if the address is not covered.
    pub fn store_u8(&mut self, address: u32, val: u8) -> Result<(), Trap> {
        self.write(address, &[val], AccessType::Write)
    }

    /// Stores a 16-bit little-endian value through the LSU check.
    ///
    /// # Errors
    ///
    /// [`Trap::StoreAccessFault`] if the span is not covered.
    pub fn store_u16(&mut self, address: u32, val: u16) -> Result<(), Trap> {
        self.write(address, &val.to_le_bytes(), AccessType::Write)
    }

    /// Stores a 32-bit little-endian value through the LSU check.
    ///
    /// # Errors
    ///
    /// [`Trap::StoreAccessFault`] if the span is not covered.
    pub fn store_u32(&mut self, address: u32, val: u32) -> Result<(), Trap> {
        self.write(address, &val.to_le_bytes(), AccessType::Write)
    }

    /// Fetches a 32-bit instruction word.
    ///
    /// # Errors
    ///
    /// [`Trap::InstructionAccessFault`] if the span leaves the ITCM.
    pub fn fetch_u32(&self, address: u32) -> Result<u32, Trap> {
        self.check(address, 4, AccessType::Fetch)?;
        Ok(u32::from_le_bytes(
            self.itcm.slice(address, 4).try_into().unwrap_or([0; 4]),
        ))
    }

    /// Reads up to `buf.len()` bytes starting at `address`, bypassing
    /// permission checks. Transfers contiguously from the start address and
    /// stops at the first unbacked byte.
    ///
    /// Returns the number of bytes actually read; callers must compare it
    /// against the requested length.
    ///
    /// # Errors
    ///
    /// [`SimulatorError::MemoryRangeExceeded`] if not a single byte is backed.
    pub fn debug_read(&self, address: u64, buf: &mut [u8]) -> Result<usize, SimulatorError> {
        let mut transferred = 0;
        while transferred < buf.len() {
            let addr = address + transferred as u64;
            let Some((region, run)) = self.backing_run(addr, buf.len() - transferred) else {
                break;
            };
            let start = addr as u32;
            buf[transferred..transferred + run].copy_from_slice(region.slice(start, run));
            transferred += run;
        }

        if transferred == 0 && !buf.is_empty() {
            return Err(SimulatorError::MemoryRangeExceeded {
                address,
                length: buf.len(),
            });
        }
        Ok(transferred)
    }

    /// Writes up to `data.len()` bytes starting at `address`, bypassing
    /// permission checks. Transfers contiguously from the start address and
    /// stops at the first unbacked byte.
    ///
    /// Returns the number of bytes actually written; callers must compare it
    /// against the requested length.
    ///
    /// # Errors
    ///
    /// [`SimulatorError::MemoryRangeExceeded`] if not a single byte is backed.
    pub fn debug_write(&mut self, address: u64, data: &[u8]) -> Result<usize, SimulatorError> {
        let mut transferred = 0;
        while transferred < data.len() {
            let addr = address + transferred as u64;
            let Some(run) = self
                .backing_run(addr, data.len() - transferred)
                .map(|(_, run)| run)
            else {
                break;
            };
            let start = addr as u32;
            let region = self.region_for_mut(start, run);
            region
                .slice_mut(start, run)
                .copy_from_slice(&data[transferred..transferred + run]);
            transferred += run;
        }

        if transferred == 0 && !data.is_empty() {
            return Err(SimulatorError::MemoryRangeExceeded {
                address,
                length: data.len(),
            });
        }
        Ok(transferred)
    }

    /// Returns the region backing `address` and the length of the contiguous
    /// run available there, capped at `max`.
    fn backing_run(&self, address: u64, max: usize) -> Option<(&Region, usize)> {
        if address > u64::from(u32::MAX) {
            return None;
        }
        let addr = address as u32;
        let region = std::iter::once(&self.itcm)
            .chain(self.windows.iter())
            .find(|r| r.contains_span(addr, 1))?;
        let run = (region.end() - address).min(max as u64) as usize;
        Some((region, run))
    }

    /// Region fully containing the span. Only valid after a successful check
    /// or backing lookup for the same span.
    fn region_for(&self, address: u32, len: usize) -> &Region {
        if self.itcm.contains_span(address, len) {
            &self.itcm
        } else {
            // The span was validated against exactly one window.
            self.windows
                .iter()
                .find(|w| w.contains_span(address, len))
                .unwrap_or(&self.itcm)
        }
    }

    fn region_for_mut(&mut self, address: u32, len: usize) -> &mut Region {
        if self.itcm.contains_span(address, len) {
            &mut self.itcm
        } else {
            self.windows
                .iter_mut()
                .find(|w| w.contains_span(address, len))
                .unwrap_or(&mut self.itcm)
        }
    }
}
