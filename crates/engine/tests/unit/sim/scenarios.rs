//! End-to-end programs exercising the whole stack.

use pretty_assertions::assert_eq;

use vcsim_core::ExecutionState;
use vcsim_core::core::csr;
use vcsim_core::isa::privileged::opcodes::{MPAUSE, MRET};

use crate::common::TestContext;
use crate::common::builder::InstructionBuilder;
use crate::common::builder::vector::*;
use crate::common::harness::DATA_BASE;

fn inst() -> InstructionBuilder {
    InstructionBuilder::new()
}

/// A vector store into unmapped memory traps with cause 7 and the base
/// address, the handler recovers by skipping the store, and the program
/// finishes with a clean halt.
#[test]
fn vector_store_fault_is_recoverable() {
    let mut ctx = TestContext::new().load(&[
        // 0x00: install the handler at 0x40.
        inst().addi(5, 0, 0x40).build(),
        inst().csrrw(0, csr::MTVEC, 5).build(),
        // 0x08: build a 16-element index vector.
        vsetivli(0, 16, VTYPE_E8M1),
        vid_v(1),
        // 0x10: store it far outside every window.
        inst().lui(10, 0xA0000).build(),
        vse8(1, 10),
        // 0x18: resumed here by the handler.
        inst().addi(28, 0, 1).build(),
        MPAUSE,
        inst().nop().build(),
        inst().nop().build(),
        inst().nop().build(),
        inst().nop().build(),
        inst().nop().build(),
        inst().nop().build(),
        inst().nop().build(),
        inst().nop().build(),
        // 0x40: handler. Record the cause, skip the faulting instruction.
        inst().csrrs(6, csr::MCAUSE, 0).build(),
        inst().csrrs(7, csr::MTVAL, 0).build(),
        inst().csrrs(29, csr::MEPC, 0).build(),
        inst().addi(29, 29, 4).build(),
        inst().csrrw(0, csr::MEPC, 29).build(),
        MRET,
    ]);

    let state = ctx.run_to_stop();

    // The fault is recoverable: the final state is a clean halt.
    assert_eq!(state, ExecutionState::Halted);
    assert_eq!(ctx.reg("t1"), 7); // store access fault
    assert_eq!(ctx.reg("t2"), 0xA000_0000); // whole-access base address
    assert_eq!(ctx.reg("mepc"), 0x18);
    assert_eq!(ctx.reg("t3"), 1); // execution resumed past the store

    // 6 instructions to the fault (the store consumes its cycle), 6 in the
    // handler, 2 after resuming.
    assert_eq!(ctx.sim.cycle_count(), 14);
}

/// Loads two u32 arrays through a data window, adds them lane-wise, and
/// stores the result.
#[test]
fn vector_add_kernel() {
    let a: Vec<u8> = [1u32, 2, 3, 4].iter().flat_map(|v| v.to_le_bytes()).collect();
    let b: Vec<u8> = [10u32, 20, 30, 40]
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect();

    let mut ctx = TestContext::new()
        .load(&[
            vsetivli(0, 4, VTYPE_E32M1),
            inst().lui(10, (DATA_BASE >> 12) as i32).build(),
            inst().addi(11, 10, 0x10).build(),
            inst().addi(12, 10, 0x20).build(),
            vle32(1, 10),
            vle32(2, 11),
            vadd_vv(3, 1, 2),
            vse32(3, 12),
            MPAUSE,
        ])
        .with_data(DATA_BASE, &a)
        .with_data(DATA_BASE + 0x10, &b);

    assert_eq!(ctx.run_to_stop(), ExecutionState::Halted);

    for (lane, expected) in [11u32, 22, 33, 44].into_iter().enumerate() {
        let addr = DATA_BASE + 0x20 + 4 * lane as u32;
        assert_eq!(ctx.read_u32(addr), expected);
    }
    assert_eq!(ctx.reg("vl"), 4);
}

/// A scalar/vector mix: broadcast a scalar bias over an index ramp and
/// store bytes through the window.
#[test]
fn biased_ramp_kernel() {
    let mut ctx = TestContext::new().load(&[
        vsetivli(0, 16, VTYPE_E8M1),
        inst().addi(5, 0, 64).build(),
        vid_v(1),
        vadd_vx(2, 1, 5),
        inst().lui(10, (DATA_BASE >> 12) as i32).build(),
        vse8(2, 10),
        MPAUSE,
    ]);
    assert_eq!(ctx.run_to_stop(), ExecutionState::Halted);

    let mut out = [0u8; 16];
    ctx.sim.read_memory(u64::from(DATA_BASE), &mut out).unwrap();
    for (i, byte) in out.iter().enumerate() {
        assert_eq!(*byte as usize, 64 + i);
    }
}
