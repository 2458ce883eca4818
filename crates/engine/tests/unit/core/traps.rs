use pretty_assertions::assert_eq;

use vcsim_core::core::csr;
use vcsim_core::{ExecutionState, SimulatorOptions};

use crate::common::TestContext;
use crate::common::builder::InstructionBuilder;

use vcsim_core::isa::privileged::opcodes::{EBREAK, ECALL, MPAUSE, MRET, WFI};

fn inst() -> InstructionBuilder {
    InstructionBuilder::new()
}

/// A handler at word index 8 (byte 0x20) that records mcause and mtval and
/// stops.
fn with_recording_handler(body: &[u32]) -> Vec<u32> {
    let mut program = vec![
        inst().addi(5, 0, 0x20).build(),
        inst().csrrw(0, csr::MTVEC, 5).build(),
    ];
    program.extend_from_slice(body);
    program.resize(8, inst().nop().build());
    program.extend_from_slice(&[
        inst().csrrs(6, csr::MCAUSE, 0).build(),
        inst().csrrs(7, csr::MTVAL, 0).build(),
        MPAUSE,
    ]);
    program
}

#[test]
fn ecall_raises_environment_call() {
    let mut ctx = TestContext::new().load(&with_recording_handler(&[ECALL]));
    assert_eq!(ctx.run_to_stop(), ExecutionState::Halted);
    assert_eq!(ctx.reg("t1"), 11);
    assert_eq!(ctx.reg("mepc"), 8);
}

#[test]
fn illegal_encoding_reports_the_instruction_word() {
    let mut ctx = TestContext::new().load(&with_recording_handler(&[0xFFFF_FFFF]));
    assert_eq!(ctx.run_to_stop(), ExecutionState::Halted);
    assert_eq!(ctx.reg("t1"), 2);
    assert_eq!(ctx.reg("t2") as u32, 0xFFFF_FFFF);
}

#[test]
fn misaligned_jump_target_faults() {
    let body = [
        inst().addi(10, 0, 0x42).build(),
        inst().jalr(0, 10, 0).build(), // target 0x42, misaligned
    ];
    let mut ctx = TestContext::new().load(&with_recording_handler(&body));
    assert_eq!(ctx.run_to_stop(), ExecutionState::Halted);
    assert_eq!(ctx.reg("t1"), 0);
    assert_eq!(ctx.reg("t2"), 0x42);
    // The fault is taken on the fetch, after the jump retired.
    assert_eq!(ctx.reg("mepc"), 0x42);
}

#[test]
fn fetch_outside_instruction_memory_faults() {
    let body = [
        inst().lui(10, 0x4).build(), // 0x4000: backed, but not by the ITCM
        inst().jalr(0, 10, 0).build(),
    ];
    let mut ctx = TestContext::new().load(&with_recording_handler(&body));
    assert_eq!(ctx.run_to_stop(), ExecutionState::Halted);
    assert_eq!(ctx.reg("t1"), 1);
    assert_eq!(ctx.reg("t2"), 0x4000);
}

#[test]
fn ebreak_stops_cleanly_when_configured() {
    let mut ctx = TestContext::new().load(&[EBREAK]);
    assert_eq!(ctx.run_to_stop(), ExecutionState::Halted);
    // A clean stop is not a trap: no cause was latched.
    assert_eq!(ctx.reg("mcause"), 0);
    assert_eq!(ctx.reg("pc"), 0);
}

#[test]
fn ebreak_traps_when_configured_to() {
    let options = SimulatorOptions {
        exit_on_ebreak: false,
        ..TestContext::options()
    };
    let mut ctx = TestContext::with_options(options).load(&with_recording_handler(&[EBREAK]));
    assert_eq!(ctx.run_to_stop(), ExecutionState::Halted);
    assert_eq!(ctx.reg("t1"), 3);
    // For a breakpoint, mtval holds the address of the ebreak itself.
    assert_eq!(ctx.reg("t2"), 8);
}

#[test]
fn mret_resumes_after_the_handler_adjusts_mepc() {
    // The handler skips the faulting instruction by bumping mepc.
    let mut ctx = TestContext::new().load(&[
        inst().addi(5, 0, 0x20).build(),
        inst().csrrw(0, csr::MTVEC, 5).build(),
        ECALL,
        inst().addi(28, 0, 1).build(), // resumed here
        MPAUSE,
        inst().nop().build(),
        inst().nop().build(),
        inst().nop().build(),
        // 0x20: handler
        inst().csrrs(6, csr::MEPC, 0).build(),
        inst().addi(6, 6, 4).build(),
        inst().csrrw(0, csr::MEPC, 6).build(),
        MRET,
    ]);
    assert_eq!(ctx.run_to_stop(), ExecutionState::Halted);
    assert_eq!(ctx.reg("t3"), 1);
}

#[test]
fn wfi_is_a_no_op() {
    let mut ctx = TestContext::new().load(&[WFI, inst().addi(5, 0, 1).build()]);
    ctx.step(2);
    assert_eq!(ctx.reg("t0"), 1);
}

#[test]
fn fault_at_the_handler_address_is_terminal() {
    // mtvec is zero, so the very first instruction faulting redirects to
    // itself: a double fault, reported as a faulted simulator.
    let mut ctx = TestContext::new().load(&[0x0000_0000]);
    assert_eq!(ctx.run_to_stop(), ExecutionState::Faulted);
    assert_eq!(ctx.reg("mcause"), 2);

    // A faulted simulator consumes no further steps.
    assert_eq!(ctx.step(10), 0);
}

#[test]
fn trap_entry_clears_vstart() {
    let body = [
        inst().csrrwi(0, csr::VSTART, 3).build(),
        ECALL,
    ];
    let mut ctx = TestContext::new().load(&with_recording_handler(&body));
    assert_eq!(ctx.run_to_stop(), ExecutionState::Halted);
    assert_eq!(ctx.reg("vstart"), 0);
}
