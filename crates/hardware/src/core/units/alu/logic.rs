//! ALU logical operations.
//!
//! Implements the six bitwise operations. All of them set condition codes
//! with the same rule: N and Z from the result, V and C cleared.

use super::{AluOp, AluOutput};
use crate::core::arch::psr::Icc;

/// Condition codes of a logical result (also used by UMULcc and SMULcc).
#[inline]
pub const fn logic_icc(r: u32) -> Icc {
    Icc {
        n: r >> 31 != 0,
        z: r == 0,
        v: false,
        c: false,
    }
}

/// Executes a bitwise logical operation.
///
/// Returns a zero result for non-logical opcodes.
pub fn execute(op: AluOp, a: u32, b: u32) -> AluOutput {
    let r = match op {
        AluOp::And => a & b,
        AluOp::AndN => a & !b,
        AluOp::Or => a | b,
        AluOp::OrN => a | !b,
        AluOp::Xor => a ^ b,
        AluOp::XNor => !(a ^ b),
        _ => 0,
    };
    AluOutput {
        value: r,
        icc: logic_icc(r),
    }
}
