use pretty_assertions::assert_eq;

use vcsim_core::core::csr;

use crate::common::TestContext;
use crate::common::builder::InstructionBuilder;

fn inst() -> InstructionBuilder {
    InstructionBuilder::new()
}

#[test]
fn csrrw_swaps_old_for_new() {
    let mut ctx = TestContext::new().load(&[
        inst().addi(5, 0, 0x55).build(),
        inst().csrrw(6, csr::MSCRATCH, 5).build(),
        inst().csrrw(7, csr::MSCRATCH, 0).build(),
    ]);
    ctx.step(3);
    assert_eq!(ctx.reg("t1"), 0); // old value was the reset value
    assert_eq!(ctx.reg("t2"), 0x55);
    assert_eq!(ctx.reg("mscratch"), 0);
}

#[test]
fn csrrs_with_x0_reads_without_writing() {
    let mut ctx = TestContext::new().load(&[inst().csrrs(5, csr::MISA, 0).build()]);
    ctx.step(1);
    // RV32IMV: MXL=1, I, M, V.
    assert_eq!(ctx.reg("t0") as u32, (1 << 30) | (1 << 8) | (1 << 12) | (1 << 21));
}

#[test]
fn csrrwi_writes_the_zero_extended_immediate() {
    let mut ctx = TestContext::new().load(&[
        inst().csrrwi(0, csr::MSCRATCH, 0x1F).build(),
    ]);
    ctx.step(1);
    assert_eq!(ctx.reg("mscratch"), 0x1F);
}

#[test]
fn mepc_write_clears_the_low_bit() {
    let mut ctx = TestContext::new().load(&[
        inst().addi(5, 0, 0x103).build(),
        inst().csrrw(0, csr::MEPC, 5).build(),
    ]);
    ctx.step(2);
    assert_eq!(ctx.reg("mepc"), 0x102);
}

#[test]
fn misa_writes_are_ignored() {
    let mut ctx = TestContext::new().load(&[
        inst().addi(5, 0, 0).build(),
        inst().csrrw(6, csr::MISA, 5).build(),
        inst().csrrs(7, csr::MISA, 0).build(),
    ]);
    ctx.step(3);
    assert_eq!(ctx.reg("t1"), ctx.reg("t2"));
    assert_ne!(ctx.reg("t2"), 0);
}

#[test]
fn write_to_read_only_csr_traps() {
    // Handler at 0x20 records mcause and halts. The csrrw targets vlenb,
    // which lives in the read-only address space.
    let mut ctx = TestContext::new().load(&[
        inst().addi(5, 0, 0x20).build(),
        inst().csrrw(0, csr::MTVEC, 5).build(),
        inst().csrrw(6, csr::VLENB, 5).build(), // traps
        inst().nop().build(),
        inst().nop().build(),
        inst().nop().build(),
        inst().nop().build(),
        inst().nop().build(),
        // 0x20: handler
        inst().csrrs(7, csr::MCAUSE, 0).build(),
        0x0010_0073, // ebreak, stops with exit_on_ebreak
    ]);
    let state = ctx.run_to_stop();
    assert_eq!(state, vcsim_core::ExecutionState::Halted);
    assert_eq!(ctx.reg("t2"), 2); // illegal instruction
    assert_eq!(ctx.reg("mepc"), 8);
}

#[test]
fn csrrs_read_of_read_only_csr_is_legal() {
    let mut ctx = TestContext::new().load(&[inst().csrrs(5, csr::VLENB, 0).build()]);
    ctx.step(1);
    assert_eq!(ctx.reg("t0"), 16); // VLEN = 128 bits
}

#[test]
fn cycle_counter_is_visible_through_csrs() {
    let mut ctx = TestContext::new().load(&[
        inst().nop().build(),
        inst().nop().build(),
        inst().csrrs(5, csr::MCYCLE, 0).build(),
    ]);
    ctx.step(3);
    // The read happens during the third cycle.
    assert_eq!(ctx.reg("t0"), 3);
}
