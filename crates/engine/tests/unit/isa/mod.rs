//! ISA decoding tests.
