//! Instruction encoding and field extraction utilities.
//!
//! Provides bit extraction functions for the SPARC V8 instruction formats
//! and the two's-complement sign extension used for every immediate field.

/// Bit mask of a 5-bit register field.
pub const REG_MASK: u32 = 0x1F;
/// Bit mask of the `op3` field (bits 19-24).
pub const OP3_MASK: u32 = 0x3F;
/// Bit mask of the `op2` field (bits 22-24).
pub const OP2_MASK: u32 = 0x7;
/// Bit mask of the condition field (bits 25-28).
pub const COND_MASK: u32 = 0xF;
/// Bit mask of the 22-bit immediate and displacement fields.
pub const IMM22_MASK: u32 = 0x003F_FFFF;
/// Bit mask of the 30-bit CALL displacement.
pub const DISP30_MASK: u32 = 0x3FFF_FFFF;
/// Bit mask of the 13-bit signed immediate.
pub const SIMM13_MASK: u32 = 0x1FFF;
/// Bit mask of the 8-bit ASI field (bits 5-12).
pub const ASI_MASK: u32 = 0xFF;
/// Bit mask of the 7-bit software trap number.
pub const SW_TRAP_MASK: u32 = 0x7F;

/// Sign-extends the low `width` bits of `value` to 32 bits.
///
/// # Arguments
///
/// * `value` - Field value; bits at and above `width` are ignored.
/// * `width` - Field width in bits (1-32).
///
/// # Returns
///
/// The two's-complement sign-extended value.
#[inline(always)]
pub const fn sign_extend(value: u32, width: u32) -> u32 {
    if width == 0 || width >= 32 {
        return value;
    }
    let shift = 32 - width;
    (((value << shift) as i32) >> shift) as u32
}

/// Trait for extracting instruction fields from encoded instructions.
///
/// Each accessor extracts one field regardless of whether the format of the
/// instruction defines it; the decoder calls only the ones that apply.
pub trait InstructionBits {
    /// Extracts the format field (bits 30-31).
    fn op(&self) -> u32;

    /// Extracts the format 0 operation field (bits 22-24).
    fn op2(&self) -> u32;

    /// Extracts the format 2/3 operation field (bits 19-24).
    fn op3(&self) -> u32;

    /// Extracts the destination register field (bits 25-29).
    fn rd(&self) -> usize;

    /// Extracts the first source register field (bits 14-18).
    fn rs1(&self) -> usize;

    /// Extracts the second source register field (bits 0-4).
    fn rs2(&self) -> usize;

    /// Returns the immediate-operand flag (bit 13).
    fn i(&self) -> bool;

    /// Extracts the sign-extended 13-bit immediate (bits 0-12).
    fn simm13(&self) -> u32;

    /// Extracts the 8-bit address space identifier (bits 5-12).
    fn asi(&self) -> u8;

    /// Extracts the 22-bit immediate of SETHI and UNIMP (bits 0-21).
    fn imm22(&self) -> u32;

    /// Extracts the sign-extended branch displacement in words (bits 0-21).
    fn disp22(&self) -> i32;

    /// Extracts the CALL displacement in words (bits 0-29).
    fn disp30(&self) -> u32;

    /// Extracts the condition field of Bicc and Ticc (bits 25-28).
    fn cond(&self) -> u32;

    /// Returns the annul bit of Bicc (bit 29).
    fn annul(&self) -> bool;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn op(&self) -> u32 {
        self >> 30
    }

    #[inline(always)]
    fn op2(&self) -> u32 {
        (self >> 22) & OP2_MASK
    }

    #[inline(always)]
    fn op3(&self) -> u32 {
        (self >> 19) & OP3_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 25) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> 14) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        (self & REG_MASK) as usize
    }

    #[inline(always)]
    fn i(&self) -> bool {
        (self >> 13) & 1 != 0
    }

    /// Sign-extends the immediate through `sign_extend`, so `-1` encodes as `0x1FFF`.
    #[inline(always)]
    fn simm13(&self) -> u32 {
        sign_extend(self & SIMM13_MASK, 13)
    }

    #[inline(always)]
    fn asi(&self) -> u8 {
        ((self >> 5) & ASI_MASK) as u8
    }

    #[inline(always)]
    fn imm22(&self) -> u32 {
        self & IMM22_MASK
    }

    #[inline(always)]
    fn disp22(&self) -> i32 {
        sign_extend(self & IMM22_MASK, 22) as i32
    }

    #[inline(always)]
    fn disp30(&self) -> u32 {
        self & DISP30_MASK
    }

    #[inline(always)]
    fn cond(&self) -> u32 {
        (self >> 25) & COND_MASK
    }

    #[inline(always)]
    fn annul(&self) -> bool {
        (self >> 29) & 1 != 0
    }
}
