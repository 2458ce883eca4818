//! Vector extension subset definitions.
//!
//! Opcodes and field encodings for the supported vector operations:
//! configuration (`vsetvli`/`vsetivli`/`vsetvl`), unit-stride loads and
//! stores, integer OPIVV/OPIVX/OPIVI arithmetic, and `vid.v`.

/// Vector opcodes and encoding fields.
pub mod opcodes;
