//! # Multiply and Divide Tests
//!
//! Covers the `%y`-based operations: multiply step, 32x32 multiplies, 64/32 divides
//! with saturation, and the LEON3 multiply-accumulate pair.

use leon3_core::common::error::{Exception, SimError};
use leon3_core::core::arch::psr::Icc;
use leon3_core::core::units::alu::muldiv::{mulscc, sdiv, smac, smul, udiv, umac, umul};
use leon3_core::isa::opcodes::op3_arith;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::instruction::reg::*;
use crate::common::builder::instruction::*;
use crate::common::harness::{RAM_BASE, TestContext};

#[test]
fn test_udiv_saturates_on_overflow() {
    let q = udiv(1, 0, 1).expect("non-zero divisor");
    assert_eq!(q.value, 0xFFFF_FFFF);
    assert!(q.overflow);
    assert!(q.icc().v);
    assert!(!q.icc().c);
}

#[rstest]
#[case::positive_overflow(0, 0x8000_0000, 1, 0x7FFF_FFFF, true)]
#[case::negative_overflow(0xFFFF_FFFF, 0x7FFF_FFFF, 1, 0x8000_0000, true)]
#[case::truncates_toward_zero(0xFFFF_FFFF, (-10i32) as u32, 3, (-3i32) as u32, false)]
#[case::min_by_minus_one(0x8000_0000, 0, 0xFFFF_FFFF, 0x7FFF_FFFF, true)]
fn test_sdiv_clamps_to_32_bits(
    #[case] y: u32,
    #[case] rs1: u32,
    #[case] divisor: u32,
    #[case] value: u32,
    #[case] overflow: bool,
) {
    let q = sdiv(y, rs1, divisor).expect("non-zero divisor");
    assert_eq!(q.value, value);
    assert_eq!(q.overflow, overflow);
}

#[test]
fn test_divide_by_zero_has_no_quotient() {
    assert!(udiv(0, 1, 0).is_none());
    assert!(sdiv(0, 1, 0).is_none());
}

#[test]
fn test_mulscc_adds_when_y_lsb_set() {
    let step = mulscc(1, 0, 5, Icc::default());
    assert_eq!(step.value, 5);
    assert_eq!(step.y, 0);

    let step = mulscc(0, 3, 5, Icc::default());
    assert_eq!(step.value, 1);
    assert_eq!(step.y, 0x8000_0000);
}

#[test]
fn test_multiplies_split_product() {
    assert_eq!(umul(0xFFFF_FFFF, 2), (1, 0xFFFF_FFFE));
    assert_eq!(smul((-1i32) as u32, 2), (0xFFFF_FFFF, 0xFFFF_FFFE));
}

#[test]
fn test_mac_accumulates_forty_bits() {
    let mac = umac(0, 0xFFFF_FFFF, 1, 1);
    assert_eq!(mac.value, 0);
    assert_eq!(mac.y, 1);

    let mac = smac(0, 0, 0xFFFF_FFFF, 2);
    assert_eq!(mac.value, 0xFFFF_FFFE);
    assert_eq!(mac.y, 0xFF);
}

#[test]
fn test_mac_uses_low_halfwords_only() {
    let mac = umac(0, 0, 0x0001_0003, 0xFFFF_0002);
    assert_eq!(mac.value, 6);
}

#[test]
fn test_udiv_instruction_divides_y_and_rs1() {
    let program = [mov(100, O0), alu_imm(op3_arith::UDIVCC, O1, O0, 7)];
    let mut ctx = TestContext::new().load_program(RAM_BASE, &program);
    ctx.run(2);

    assert_eq!(ctx.get_reg(O1), 14);
    assert!(!ctx.cpu().psr.icc().z);
}

#[test]
fn test_umul_instruction_writes_y() {
    let program = [mov(-1, O0), alu_imm(op3_arith::UMUL, O1, O0, 16)];
    let mut ctx = TestContext::new().load_program(RAM_BASE, &program);
    ctx.run(2);

    assert_eq!(ctx.get_reg(O1), 0xFFFF_FFF0);
    assert_eq!(ctx.cpu().y, 0xF);
}

#[test]
fn test_smac_instruction_updates_accumulator() {
    let program = [
        mov(-1, O0),
        mov(2, O1),
        alu_reg(op3_arith::SMAC, O2, O0, O1),
        alu_reg(op3_arith::SMAC, O3, O0, O1),
    ];
    let mut ctx = TestContext::new().load_program(RAM_BASE, &program);
    ctx.run(4);

    assert_eq!(ctx.get_reg(O2), 0xFFFF_FFFE);
    assert_eq!(ctx.get_reg(O3), 0xFFFF_FFFC);
    assert_eq!(ctx.cpu().asr[18], 0xFFFF_FFFC);
    assert_eq!(ctx.cpu().y, 0xFF);
}

#[test]
fn test_division_by_zero_traps() {
    let program = [alu_imm(op3_arith::UDIV, O1, O0, 0)];
    let mut ctx = TestContext::tsim().load_program(RAM_BASE, &program);

    let outcome = ctx.step();
    assert_eq!(outcome.trap, Some(Exception::DivisionByZero));
    assert_eq!(ctx.trap_type(), 0x2a);
}

#[test]
fn test_division_by_zero_with_traps_disabled_is_fatal() {
    let program = [alu_imm(op3_arith::SDIV, O1, O0, 0)];
    let mut ctx = TestContext::new().load_program(RAM_BASE, &program);

    match ctx.try_step() {
        Err(SimError::ErrorMode { exception, pc, .. }) => {
            assert_eq!(exception, Exception::DivisionByZero);
            assert_eq!(pc, RAM_BASE);
        }
        other => panic!("expected error mode, got {other:?}"),
    }
}
