//! # External Interrupt Tests
//!
//! Interrupt selection against ET and PIL, the synthetic interrupt instruction,
//! and the acknowledge output.

use leon3_core::common::data::Asi;
use leon3_core::common::error::Exception;
use leon3_core::core::Cpu;
use leon3_core::core::arch::psr::Psr;
use leon3_core::core::arch::trap::TrapTable;
use leon3_core::isa::Instruction;
use leon3_core::soc::Ram;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::instruction::*;
use crate::common::harness::{RAM_BASE, RAM_SIZE, TestContext, test_config};
use crate::common::mocks::irq::MockIrqLine;

/// Traps enabled, PIL 15, user mode, window 0.
const PSR_USER_PIL15: u32 = 0xF300_0F20;

#[test]
fn test_level_15_is_taken_at_pil_15() {
    let mut ctx = TestContext::tsim().load_program(RAM_BASE, &[nop(), nop()]);
    ctx.cpu_mut().psr = Psr(PSR_USER_PIL15);
    ctx.cpu_mut().set_irq(15);

    let outcome = ctx.step();
    assert_eq!(outcome.instruction, Some(Instruction::Interrupt { level: 15 }));
    assert_eq!(outcome.trap, Some(Exception::InterruptLevel15));
    assert_eq!(ctx.cpu().psr, Psr(0xF300_0F87));
    assert_eq!(ctx.cpu().tbr, 0x1F0);
    assert_eq!(ctx.cpu().pc, 0x1F0);
    // The interrupted instruction was not executed.
    assert_eq!(ctx.get_reg(17), RAM_BASE);
    assert_eq!(ctx.cpu().pending_irq, None);
    assert_eq!(ctx.sim.irq_log.drain(), vec![15]);
    assert_eq!(ctx.cpu().stats.interrupts_taken, 1);
    assert_eq!(ctx.cpu().stats.inst_system, 1);
}

#[test]
fn test_masked_level_is_held_pending() {
    let mut ctx = TestContext::tsim().load_program(RAM_BASE, &[nop(), nop()]);
    ctx.cpu_mut().psr = Psr(PSR_USER_PIL15);
    ctx.cpu_mut().set_irq(14);

    let outcome = ctx.step();
    assert_eq!(outcome.trap, None);
    assert_eq!(ctx.cpu().pc, RAM_BASE + 4);
    assert_eq!(ctx.cpu().pending_irq, Some(14));
    assert!(ctx.sim.irq_log.is_empty());
}

#[test]
fn test_interrupts_wait_for_enabled_traps() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[nop(), nop()]);
    ctx.cpu_mut().set_irq(15);

    let outcome = ctx.step();
    assert_eq!(outcome.trap, None);
    assert_eq!(ctx.cpu().pending_interrupt(), None);
    assert_eq!(ctx.cpu().pending_irq, Some(15));
}

#[test]
fn test_set_irq_zero_releases_line() {
    let mut ctx = TestContext::new();
    ctx.cpu_mut().set_irq(3);
    assert_eq!(ctx.cpu().pending_irq, Some(3));
    ctx.cpu_mut().set_irq(0);
    assert_eq!(ctx.cpu().pending_irq, None);
    ctx.cpu_mut().set_irq(16);
    assert_eq!(ctx.cpu().pending_irq, None);
}

#[test]
fn test_taken_interrupt_drives_acknowledge() {
    let mut irq = MockIrqLine::new();
    irq.expect_acknowledge()
        .with(eq(11))
        .times(1)
        .return_const(());

    let mut config = test_config();
    config.cpu.tsim_compat = true;
    let ram = Ram::new(RAM_BASE, RAM_SIZE);
    let mut cpu =
        Cpu::new(&config, Box::new(ram), Box::new(irq)).expect("test configuration is valid");
    cpu.memory
        .write_word(RAM_BASE, nop(), Asi::SUPERVISOR_DATA)
        .unwrap();
    cpu.set_irq(11);

    let outcome = cpu.step().unwrap();
    assert_eq!(outcome.trap, Some(Exception::InterruptLevel11));
    assert_eq!(TrapTable::trap_type_of(cpu.tbr), 0x1B);
}

#[rstest]
#[case::disabled(0x0000_0000, 15, false)]
#[case::nmi_ignores_pil(0x0000_0F20, 15, true)]
#[case::above_pil(0x0000_0520, 6, true)]
#[case::equal_to_pil(0x0000_0520, 5, false)]
#[case::below_pil(0x0000_0520, 4, false)]
fn test_interrupt_enable_rule(#[case] psr: u32, #[case] level: u8, #[case] taken: bool) {
    assert_eq!(TrapTable::interrupt_enabled(Psr(psr), level), taken);
}
