//! # Special Register Tests
//!
//! RD/WR access to Y, PSR, WIM, TBR and the ancillary state registers, their
//! privilege rules, and the reset state.

use leon3_core::common::error::Exception;
use leon3_core::core::arch::psr::Psr;
use leon3_core::isa::opcodes::op3_arith;
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::reg::*;
use crate::common::builder::instruction::*;
use crate::common::harness::{RAM_BASE, TestContext, test_config};

/// Traps enabled, user mode, window 0.
const PSR_USER: u32 = 0xF300_0020;

fn write_special(op3: u32, rs1: u32, simm13: i32) -> u32 {
    InstructionBuilder::arith(op3).rs1(rs1).imm(simm13).build()
}

fn read_special(op3: u32, rd: u32) -> u32 {
    InstructionBuilder::arith(op3).rd(rd).build()
}

#[test]
fn test_reset_state() {
    let ctx = TestContext::new();
    let cpu = ctx.cpu();
    assert_eq!(cpu.psr, Psr(0xF300_0080));
    assert_eq!(cpu.wim, 0);
    assert_eq!(cpu.tbr, 0);
    assert_eq!(cpu.pc, RAM_BASE);
    assert_eq!(cpu.npc, RAM_BASE + 4);
    assert_eq!(cpu.asr[17], 0x307);
}

#[test]
fn test_tsim_reset_state() {
    let ctx = TestContext::tsim();
    assert_eq!(ctx.cpu().psr, Psr(0xF300_00E0));
    assert_eq!(ctx.cpu().wim, 2);
}

#[test]
fn test_reset_honours_processor_id_and_tbr_base() {
    let mut config = test_config();
    config.cpu.processor_id = 2;
    config.cpu.num_windows = 4;
    config.cpu.tbr_base = 0x4000_0000;
    let ctx = TestContext::with_config(config);

    assert_eq!(ctx.cpu().asr[17], 0x2000_0303);
    assert_eq!(ctx.cpu().tbr, 0x4000_0000);
}

#[test]
fn test_rdasr17_reads_configuration() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[rdasr(O0, 17)]);
    ctx.step();
    assert_eq!(ctx.get_reg(O0), 0x307);
}

#[test]
fn test_asr_reads_are_allowed_in_user_mode() {
    let mut ctx = TestContext::tsim().load_program(RAM_BASE, &[rdasr(O0, 17), rdasr(O1, 0)]);
    ctx.cpu_mut().psr = Psr(PSR_USER);
    ctx.cpu_mut().y = 9;
    ctx.run(2);

    assert_eq!(ctx.get_reg(O0), 0x307);
    assert_eq!(ctx.get_reg(O1), 9);
    assert_eq!(ctx.cpu().stats.traps_taken, 0);
}

#[test]
fn test_psr_read_in_user_mode_is_privileged() {
    let mut ctx =
        TestContext::tsim().load_program(RAM_BASE, &[read_special(op3_arith::RDPSR, O0)]);
    ctx.cpu_mut().psr = Psr(PSR_USER);

    let outcome = ctx.step();
    assert_eq!(outcome.trap, Some(Exception::PrivilegedInstruction));
    assert_eq!(ctx.trap_type(), 3);
}

#[test]
fn test_wim_write_in_user_mode_is_privileged() {
    let mut ctx =
        TestContext::tsim().load_program(RAM_BASE, &[write_special(op3_arith::WRWIM, G0, 1)]);
    ctx.cpu_mut().psr = Psr(PSR_USER);

    let outcome = ctx.step();
    assert_eq!(outcome.trap, Some(Exception::PrivilegedInstruction));
    assert_eq!(ctx.cpu().wim, 2);
}

#[test]
fn test_write_stores_xor_of_operands() {
    let mut ctx =
        TestContext::new().load_program(RAM_BASE, &[write_special(op3_arith::WRASR, O1, 5)]);
    ctx.set_reg(O1, 0xF0);
    ctx.step();
    assert_eq!(ctx.cpu().y, 0xF5);
}

#[test]
fn test_psr_write_keeps_version_and_clears_ef() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[wrpsr(O1, 0)]);
    ctx.set_reg(O1, 0xFF00_10E3);
    ctx.step();

    assert_eq!(ctx.cpu().psr, Psr(0xF300_00E3));
    assert!(!ctx.cpu().psr.ef());
    assert_eq!(ctx.cpu().regs.cwp(), 3);
}

#[test]
fn test_psr_write_with_unimplemented_window_is_illegal() {
    let mut ctx = TestContext::tsim().load_program(RAM_BASE, &[wrpsr(G0, 0xE8)]);

    let outcome = ctx.step();
    assert_eq!(outcome.trap, Some(Exception::IllegalInstruction));
    assert_eq!(ctx.trap_type(), 2);
}

#[test]
fn test_wim_write_is_masked_to_implemented_windows() {
    let mut ctx =
        TestContext::new().load_program(RAM_BASE, &[write_special(op3_arith::WRWIM, G0, -1)]);
    ctx.step();
    assert_eq!(ctx.cpu().wim, 0xFF);
    assert_eq!(ctx.cpu().wim_mask(), 0xFF);
}

#[test]
fn test_tbr_write_replaces_only_base() {
    let mut ctx =
        TestContext::new().load_program(RAM_BASE, &[write_special(op3_arith::WRTBR, O1, 0)]);
    ctx.cpu_mut().tbr = 0x0000_0850;
    ctx.set_reg(O1, 0x4000_1ABC);
    ctx.step();
    assert_eq!(ctx.cpu().tbr, 0x4000_1850);
}

#[test]
fn test_stbar_and_flush_only_advance() {
    let stbar = InstructionBuilder::arith(op3_arith::RDASR).rs1(15).build();
    let flush = write_special(op3_arith::FLUSH, O0, 0);
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[stbar, flush]);
    ctx.run(2);

    assert_eq!(ctx.cpu().pc, RAM_BASE + 8);
    assert_eq!(ctx.cpu().stats.inst_system, 2);
}
