//! # Trap Dispatch Tests
//!
//! Trap entry (window rotation, PC/NPC save, TBR vectoring), return through
//! JMPL/RETT, error mode, and the trap type table.

use leon3_core::common::error::{Exception, SimError};
use leon3_core::core::arch::psr::Psr;
use leon3_core::core::arch::trap::TrapTable;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::instruction::reg::*;
use crate::common::builder::instruction::*;
use crate::common::harness::{RAM_BASE, TestContext, test_config};

/// TSIM-compatible context with RAM at address 0 so the trap table is mapped.
fn low_memory_context() -> TestContext {
    let mut config = test_config();
    config.memory.ram_base = 0;
    config.memory.ram_size = 0x1_0000;
    config.general.start_pc = 0;
    config.cpu.tsim_compat = true;
    TestContext::with_config(config)
}

#[test]
fn test_trap_entry_saves_state_and_vectors() {
    let mut ctx = low_memory_context().load_program(0x1000, &[unimp(0)]);

    let outcome = ctx.step();
    assert_eq!(outcome.pc, 0x1000);
    assert_eq!(outcome.trap, Some(Exception::IllegalInstruction));
    assert_eq!(ctx.cpu().pc, 0x20);
    assert_eq!(ctx.cpu().npc, 0x24);
    assert_eq!(ctx.cpu().tbr, 0x20);
    assert_eq!(ctx.cpu().psr, Psr(0xF300_00C7));
    assert_eq!(ctx.get_reg(L1), 0x1000);
    assert_eq!(ctx.get_reg(L2), 0x1004);
    assert_eq!(ctx.cpu().stats.traps_taken, 1);
}

#[test]
fn test_handler_returns_past_trapped_instruction() {
    let mut ctx = low_memory_context().load_program(0x1000, &[unimp(0), nop(), nop()]);
    ctx.write_word(0x20, jmpl(G0, L2, 0));
    ctx.write_word(0x24, rett(L2, 4));

    ctx.step();
    ctx.step();
    let outcome = ctx.step();

    assert_eq!(outcome.trap, None);
    assert_eq!(ctx.cpu().pc, 0x1004);
    assert_eq!(ctx.cpu().npc, 0x1008);
    assert_eq!(ctx.cpu().psr, Psr(0xF300_00E0));
}

#[test]
fn test_misaligned_load_traps() {
    let program = [ld(O1, O0, 2)];
    let mut ctx = TestContext::tsim().load_program(RAM_BASE, &program);
    ctx.set_reg(O0, RAM_BASE);

    let outcome = ctx.step();
    assert_eq!(outcome.trap, Some(Exception::MemAddrNotAligned));
    assert_eq!(ctx.trap_type(), 7);
}

#[test]
fn test_rett_with_traps_enabled_is_illegal() {
    let program = [rett(L2, 4)];
    let mut ctx = TestContext::tsim().load_program(RAM_BASE, &program);

    let outcome = ctx.step();
    assert_eq!(outcome.trap, Some(Exception::IllegalInstruction));
    assert_eq!(ctx.trap_type(), 2);
}

#[test]
fn test_rett_in_user_mode_with_traps_enabled_is_privileged() {
    let program = [rett(L2, 4)];
    let mut ctx = TestContext::tsim().load_program(RAM_BASE, &program);
    ctx.cpu_mut().psr = Psr(0xF300_0020);

    let outcome = ctx.step();
    assert_eq!(outcome.trap, Some(Exception::PrivilegedInstruction));
}

#[test]
fn test_rett_in_user_mode_with_traps_disabled_is_fatal() {
    let program = [rett(G0, 0)];
    let mut ctx = TestContext::new().load_program(RAM_BASE, &program);
    ctx.cpu_mut().psr = Psr(0xF300_0000);

    let err = ctx.try_step().unwrap_err();
    assert!(matches!(err, SimError::RettInvariant { supervisor: false, .. }));
}

#[test]
fn test_rett_into_invalid_window_is_fatal() {
    let program = [rett(G0, 0)];
    let mut ctx = TestContext::new().load_program(RAM_BASE, &program);
    ctx.cpu_mut().wim = 1 << 1;

    let err = ctx.try_step().unwrap_err();
    assert!(matches!(err, SimError::RettInvariant { new_cwp: 1, .. }));
}

#[test]
fn test_software_trap_number_selects_vector() {
    let program = [ta(5)];
    let mut ctx = TestContext::tsim().load_program(RAM_BASE, &program);

    let outcome = ctx.step();
    assert_eq!(outcome.trap, Some(Exception::TrapInstruction));
    assert_eq!(ctx.trap_type(), 0x85);
    assert_eq!(ctx.cpu().pc, 0x850);
}

#[test]
fn test_precise_trap_with_traps_disabled_enters_error_mode() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[unimp(0)]);

    match ctx.try_step() {
        Err(SimError::ErrorMode {
            exception,
            pc,
            mnemonic,
        }) => {
            assert_eq!(exception, Exception::IllegalInstruction);
            assert_eq!(pc, RAM_BASE);
            assert_eq!(mnemonic, "unimp 0x0");
        }
        other => panic!("expected error mode, got {other:?}"),
    }
}

#[test]
fn test_interrupt_with_traps_disabled_is_ignored() {
    let mut ctx = TestContext::new();
    let taken = ctx
        .cpu_mut()
        .raise_exception(Exception::InterruptLevel15, 0)
        .expect("interrupts never enter error mode");
    assert!(!taken);
    assert_eq!(ctx.cpu().stats.traps_taken, 0);
}

#[test]
fn test_reset_exception_vectors_to_zero() {
    let mut ctx = TestContext::tsim();
    let taken = ctx.cpu_mut().raise_exception(Exception::Reset, 0).unwrap();
    assert!(taken);
    assert_eq!(ctx.cpu().pc, 0);
    assert_eq!(ctx.cpu().npc, 4);
}

#[test]
fn test_trap_entry_ignores_wim() {
    let mut ctx = TestContext::tsim();
    ctx.cpu_mut().wim = 0xFF;
    ctx.cpu_mut()
        .raise_exception(Exception::IllegalInstruction, 0)
        .unwrap();
    assert_eq!(ctx.cpu().psr.cwp(), 7);
}

#[rstest]
#[case(Exception::InstrAccessError, 0, 0x21)]
#[case(Exception::PrivilegedInstruction, 0, 0x03)]
#[case(Exception::WindowOverflow, 0, 0x05)]
#[case(Exception::DataAccessError, 0, 0x29)]
#[case(Exception::TagOverflow, 0, 0x0a)]
#[case(Exception::DivisionByZero, 0, 0x2a)]
#[case(Exception::TrapInstruction, 0x85, 0x85)]
#[case(Exception::ImplDependent, 3, 0x63)]
#[case(Exception::InterruptLevel15, 0, 0x1f)]
#[case(Exception::InterruptLevel1, 0, 0x11)]
fn test_trap_type_table(#[case] exception: Exception, #[case] offset: u32, #[case] tt: u32) {
    assert_eq!(TrapTable::trap_type(exception, offset), Some(tt));
}

#[test]
fn test_with_trap_type_keeps_base() {
    assert_eq!(TrapTable::with_trap_type(0x4000_0FF0, 0x11), 0x4000_0110);
    assert_eq!(TrapTable::trap_type_of(0x4000_0110), 0x11);
    assert_eq!(TrapTable::trap_type(Exception::Reset, 0), None);
}
