//! ALU multiply and divide operations.
//!
//! Implements the operations that read or write `%y` (and, for the
//! multiply-accumulate pair, `%asr18`). Each function takes the current
//! special-register values and returns the new ones; the execution context
//! performs the writes.
//!
//! Divide results saturate on overflow: unsigned quotients that do not fit in
//! 32 bits become `0xFFFF_FFFF`, signed quotients clamp to `0x7FFF_FFFF` or
//! `0x8000_0000` and report V.

use super::arithmetic::add_icc;
use crate::core::arch::psr::Icc;

/// Mask of the multiply-accumulate operand bits.
const MAC_OPERAND_MASK: u32 = 0xFFFF;
/// Mask of the accumulator extension byte kept in `%y`.
const MAC_HIGH_MASK: u64 = 0xFF;
/// Width of the multiply-accumulate accumulator in bits.
const MAC_ACCUMULATOR_BITS: u32 = 40;

/// Result of a multiply step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MulStep {
    /// Partial product written to `rd`.
    pub value: u32,
    /// New `%y`.
    pub y: u32,
    /// New condition codes.
    pub icc: Icc,
}

/// Performs one MULScc step.
///
/// # Arguments
///
/// * `y`   - Current `%y`.
/// * `rs1` - Partial product so far.
/// * `op2` - Multiplicand.
/// * `icc` - Current condition codes; `N ^ V` is shifted into bit 31.
///
/// # Returns
///
/// The new partial product, `%y` shifted right with `rs1` bit 0 entering at bit 31,
/// and the add-rule condition codes.
pub fn mulscc(y: u32, rs1: u32, op2: u32, icc: Icc) -> MulStep {
    let op1 = (u32::from(icc.n ^ icc.v) << 31) | (rs1 >> 1);
    let op2 = if y & 1 != 0 { op2 } else { 0 };
    let value = op1.wrapping_add(op2);
    MulStep {
        value,
        y: (y >> 1) | (rs1 << 31),
        icc: add_icc(op1, op2, value),
    }
}

/// Unsigned 32x32 multiply.
///
/// # Returns
///
/// `(high, low)`: the high word goes to `%y`, the low word to `rd`.
pub fn umul(a: u32, b: u32) -> (u32, u32) {
    let p = u64::from(a) * u64::from(b);
    ((p >> 32) as u32, p as u32)
}

/// Signed 32x32 multiply.
///
/// # Returns
///
/// `(high, low)`: the high word goes to `%y`, the low word to `rd`.
pub fn smul(a: u32, b: u32) -> (u32, u32) {
    let p = i64::from(a as i32) * i64::from(b as i32);
    ((p >> 32) as u32, p as u32)
}

/// Quotient of a 64/32 divide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quotient {
    /// Saturated 32-bit quotient.
    pub value: u32,
    /// The true quotient did not fit in 32 bits.
    pub overflow: bool,
}

impl Quotient {
    /// Condition codes of the `cc` form: N and Z from the value, V from overflow, C clear.
    pub const fn icc(self) -> Icc {
        Icc {
            n: self.value >> 31 != 0,
            z: self.value == 0,
            v: self.overflow,
            c: false,
        }
    }
}

/// Unsigned divide of `(y:rs1) / divisor`.
///
/// # Returns
///
/// `None` when `divisor` is zero.
pub fn udiv(y: u32, rs1: u32, divisor: u32) -> Option<Quotient> {
    if divisor == 0 {
        return None;
    }
    let dividend = (u64::from(y) << 32) | u64::from(rs1);
    let q = dividend / u64::from(divisor);
    let overflow = q > u64::from(u32::MAX);
    Some(Quotient {
        value: if overflow { u32::MAX } else { q as u32 },
        overflow,
    })
}

/// Signed divide of `(y:rs1) / divisor`.
///
/// # Returns
///
/// `None` when `divisor` is zero.
pub fn sdiv(y: u32, rs1: u32, divisor: u32) -> Option<Quotient> {
    if divisor == 0 {
        return None;
    }
    let dividend = ((u64::from(y) << 32) | u64::from(rs1)) as i64;
    // i64::MIN / -1 is the only quotient that does not fit in i64; it is positive.
    let q = dividend
        .checked_div(i64::from(divisor as i32))
        .unwrap_or(i64::MAX);
    let value = if q > i64::from(i32::MAX) {
        0x7FFF_FFFF
    } else if q < i64::from(i32::MIN) {
        0x8000_0000
    } else {
        q as u32
    };
    Some(Quotient {
        value,
        overflow: q > i64::from(i32::MAX) || q < i64::from(i32::MIN),
    })
}

/// Result of a multiply-accumulate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MacResult {
    /// Low 32 bits of the accumulator, written to both `rd` and `%asr18`.
    pub value: u32,
    /// New `%y`: bits 32-39 of the accumulator.
    pub y: u32,
}

/// Unsigned multiply-accumulate.
///
/// Multiplies the low halfwords of the operands and adds the product to the
/// 40-bit accumulator `{%y[7:0], %asr18}`.
pub fn umac(y: u32, acc_low: u32, a: u32, b: u32) -> MacResult {
    let product = u64::from(a & MAC_OPERAND_MASK) * u64::from(b & MAC_OPERAND_MASK);
    let acc = ((u64::from(y) & MAC_HIGH_MASK) << 32) | u64::from(acc_low);
    let sum = acc.wrapping_add(product);
    MacResult {
        value: sum as u32,
        y: ((sum >> 32) & MAC_HIGH_MASK) as u32,
    }
}

/// Signed multiply-accumulate.
///
/// Multiplies the sign-extended low halfwords and adds the product to the
/// accumulator interpreted as a signed 40-bit value.
pub fn smac(y: u32, acc_low: u32, a: u32, b: u32) -> MacResult {
    let product = i64::from(a as u16 as i16) * i64::from(b as u16 as i16);
    let raw = ((u64::from(y) & MAC_HIGH_MASK) << 32) | u64::from(acc_low);
    let shift = 64 - MAC_ACCUMULATOR_BITS;
    let acc = ((raw << shift) as i64) >> shift;
    let sum = acc.wrapping_add(product) as u64;
    MacResult {
        value: sum as u32,
        y: ((sum >> 32) & MAC_HIGH_MASK) as u32,
    }
}
