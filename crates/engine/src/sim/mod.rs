//! Program loading and execution control.

pub mod loader;
pub mod simulator;

pub use loader::{ProgramImage, Segment};
pub use simulator::{ExecutionState, Simulator};
