//! Memory access types.
//!
//! Classification of memory accesses used by the memory subsystem for
//! permission validation and fault-cause selection.

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch. Granted only from the ITCM.
    Fetch,

    /// Data read issued by a load instruction.
    Read,

    /// Data write issued by a store instruction.
    Write,
}
