//! Shared test infrastructure.

pub mod elf;

pub use harness::TestContext;
