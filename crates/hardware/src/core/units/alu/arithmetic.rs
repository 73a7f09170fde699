//! ALU arithmetic operations.
//!
//! Implements 32-bit addition and subtraction, with and without carry, and the
//! tagged variants. The SPARC V8 condition-code rules for addition and
//! subtraction live here and are shared with the multiply step.

use super::{AluOp, AluOutput};
use crate::core::arch::psr::Icc;

/// Mask of the two tag bits checked by tagged arithmetic.
const TAG_MASK: u32 = 0x3;

/// Condition codes of an addition `r = a + b (+ c)`.
#[inline]
pub const fn add_icc(a: u32, b: u32, r: u32) -> Icc {
    Icc {
        n: r >> 31 != 0,
        z: r == 0,
        v: ((a & b & !r) | (!a & !b & r)) >> 31 != 0,
        c: ((a & b) | ((a | b) & !r)) >> 31 != 0,
    }
}

/// Condition codes of a subtraction `r = a - b (- c)`.
#[inline]
pub const fn sub_icc(a: u32, b: u32, r: u32) -> Icc {
    Icc {
        n: r >> 31 != 0,
        z: r == 0,
        v: ((a & !b & !r) | (!a & b & r)) >> 31 != 0,
        c: ((!a & b) | ((!a | b) & r)) >> 31 != 0,
    }
}

/// Executes an add or subtract.
///
/// # Arguments
///
/// * `op`    - One of `Add`, `AddX`, `Sub`, `SubX`.
/// * `a`     - First operand.
/// * `b`     - Second operand.
/// * `carry` - Incoming carry for the X forms.
///
/// # Returns
///
/// The wrapped 32-bit result with its condition codes. Returns a zero result
/// for non-arithmetic opcodes.
pub fn execute(op: AluOp, a: u32, b: u32, carry: bool) -> AluOutput {
    let c = u32::from(carry);
    match op {
        AluOp::Add | AluOp::AddX => {
            let r = if op == AluOp::AddX {
                a.wrapping_add(b).wrapping_add(c)
            } else {
                a.wrapping_add(b)
            };
            AluOutput {
                value: r,
                icc: add_icc(a, b, r),
            }
        }
        AluOp::Sub | AluOp::SubX => {
            let r = if op == AluOp::SubX {
                a.wrapping_sub(b).wrapping_sub(c)
            } else {
                a.wrapping_sub(b)
            };
            AluOutput {
                value: r,
                icc: sub_icc(a, b, r),
            }
        }
        _ => AluOutput {
            value: 0,
            icc: Icc::default(),
        },
    }
}

/// Tagged addition: the add rule, with V also set when either tag is non-zero.
pub fn tagged_add(a: u32, b: u32) -> AluOutput {
    let r = a.wrapping_add(b);
    let mut icc = add_icc(a, b, r);
    icc.v |= (a | b) & TAG_MASK != 0;
    AluOutput { value: r, icc }
}

/// Tagged subtraction: the sub rule, with V also set when either tag is non-zero.
pub fn tagged_sub(a: u32, b: u32) -> AluOutput {
    let r = a.wrapping_sub(b);
    let mut icc = sub_icc(a, b, r);
    icc.v |= (a | b) & TAG_MASK != 0;
    AluOutput { value: r, icc }
}
