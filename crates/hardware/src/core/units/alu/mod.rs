//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer ALU of the SPARC integer unit.
//! It computes results and integer condition codes for arithmetic,
//! logical, shift, tagged, multiply and divide operations.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, AddX, Sub, SubX, tagged add/subtract, and the add/sub ICC rules
//! - [`logic`]:      And, AndN, Or, OrN, Xor, XNor, and the logic ICC rule
//! - [`shifts`]:     Sll, Srl, Sra
//! - [`muldiv`]:     MulScc, UMul, SMul, UDiv, SDiv, UMac, SMac
//!
//! Every function here is pure; reading and writing `%y`, `%asr18` and the PSR is
//! left to the execution context.

/// Integer arithmetic operations (add, subtract, tagged) and their condition codes.
pub mod arithmetic;

/// Bitwise logical operations.
pub mod logic;

/// Multiply, multiply-step, multiply-accumulate, and divide.
pub mod muldiv;

/// Shift operations (sll, srl, sra).
pub mod shifts;

use crate::core::arch::psr::Icc;

/// Integer operate instructions executed by the ALU.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// `rs1 + op2`.
    Add,
    /// `rs1 + op2 + C`.
    AddX,
    /// `rs1 - op2`.
    Sub,
    /// `rs1 - op2 - C`.
    SubX,
    /// `rs1 & op2`.
    And,
    /// `rs1 & !op2`.
    AndN,
    /// `rs1 | op2`.
    Or,
    /// `rs1 | !op2`.
    OrN,
    /// `rs1 ^ op2`.
    Xor,
    /// `!(rs1 ^ op2)`.
    XNor,
    /// Shift left logical.
    Sll,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Tagged add; V also reports non-zero tag bits.
    TAdd,
    /// Tagged subtract; V also reports non-zero tag bits.
    TSub,
    /// Tagged add that traps on overflow.
    TAddTv,
    /// Tagged subtract that traps on overflow.
    TSubTv,
    /// Multiply step.
    MulScc,
    /// Unsigned 32x32 multiply.
    UMul,
    /// Signed 32x32 multiply.
    SMul,
    /// Unsigned 64/32 divide.
    UDiv,
    /// Signed 64/32 divide.
    SDiv,
    /// Unsigned 16x16 multiply-accumulate.
    UMac,
    /// Signed 16x16 multiply-accumulate.
    SMac,
}

impl AluOp {
    /// Returns `true` for operations whose result depends only on the operands and carry.
    pub const fn is_simple(self) -> bool {
        !matches!(
            self,
            Self::MulScc
                | Self::UMul
                | Self::SMul
                | Self::UDiv
                | Self::SDiv
                | Self::UMac
                | Self::SMac
        )
    }

    /// Returns `true` for the tagged operations that trap on overflow.
    pub const fn traps_on_overflow(self) -> bool {
        matches!(self, Self::TAddTv | Self::TSubTv)
    }
}

/// Result of a simple ALU operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluOutput {
    /// The 32-bit result.
    pub value: u32,
    /// Condition codes the `cc` form of the instruction would write.
    pub icc: Icc,
}

/// Arithmetic Logic Unit (ALU) for integer operations.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes a simple integer ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op`    - The ALU operation to perform
    /// * `a`     - First operand (`rs1`)
    /// * `b`     - Second operand (`rs2` or the sign-extended immediate)
    /// * `carry` - Current ICC carry, consumed by ADDX and SUBX
    ///
    /// # Returns
    ///
    /// The result and condition codes, or `None` for operations that read or write
    /// `%y` and therefore run through [`muldiv`].
    ///
    /// # Examples
    ///
    /// ```
    /// use leon3_core::core::units::alu::{Alu, AluOp};
    ///
    /// let out = Alu::execute(AluOp::Add, 0x7FFF_FFFF, 1, false).unwrap();
    /// assert_eq!(out.value, 0x8000_0000);
    /// assert!(out.icc.n && out.icc.v && !out.icc.z && !out.icc.c);
    ///
    /// let out = Alu::execute(AluOp::Sub, 0, 1, false).unwrap();
    /// assert_eq!(out.value, 0xFFFF_FFFF);
    /// assert!(out.icc.n && out.icc.c);
    /// ```
    pub fn execute(op: AluOp, a: u32, b: u32, carry: bool) -> Option<AluOutput> {
        let out = match op {
            AluOp::Add | AluOp::AddX | AluOp::Sub | AluOp::SubX => {
                arithmetic::execute(op, a, b, carry)
            }
            AluOp::TAdd | AluOp::TAddTv => arithmetic::tagged_add(a, b),
            AluOp::TSub | AluOp::TSubTv => arithmetic::tagged_sub(a, b),
            AluOp::And | AluOp::AndN | AluOp::Or | AluOp::OrN | AluOp::Xor | AluOp::XNor => {
                logic::execute(op, a, b)
            }
            AluOp::Sll | AluOp::Srl | AluOp::Sra => shifts::execute(op, a, b),
            _ => return None,
        };
        Some(out)
    }
}
