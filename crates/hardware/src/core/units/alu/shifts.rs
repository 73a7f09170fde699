//! ALU shift operations.
//!
//! Implements logical left, logical right, and arithmetic right shifts.
//! Only the low 5 bits of the shift count are used. Shifts never modify
//! the condition codes; the returned flags are those of the logic rule and
//! are ignored by the caller.

use super::{AluOp, AluOutput};
use super::logic::logic_icc;

/// Mask of the shift count.
const SHAMT_MASK: u32 = 0x1F;

/// Executes a shift operation.
///
/// # Arguments
///
/// * `op` - One of `Sll`, `Srl`, `Sra`.
/// * `a`  - Value to shift.
/// * `b`  - Shift count; only bits 0-4 are used.
///
/// # Returns
///
/// The shifted value. Returns `a` unchanged for non-shift opcodes.
pub fn execute(op: AluOp, a: u32, b: u32) -> AluOutput {
    let shamt = b & SHAMT_MASK;
    let r = match op {
        AluOp::Sll => a << shamt,
        AluOp::Srl => a >> shamt,
        AluOp::Sra => ((a as i32) >> shamt) as u32,
        _ => a,
    };
    AluOutput {
        value: r,
        icc: logic_icc(r),
    }
}
