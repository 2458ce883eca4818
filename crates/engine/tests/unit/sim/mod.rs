//! Execution controller tests.

pub mod scenarios;
