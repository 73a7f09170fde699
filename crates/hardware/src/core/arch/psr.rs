//! Processor State Register.
//!
//! This module defines the SPARC V8 Processor State Register (`%psr`) and its fields.
//! It provides:
//! 1. **Field Layout:** Bit positions and masks of CWP, ET, PS, S, PIL, EF, EC, ICC, version and implementation.
//! 2. **Typed Access:** A `Psr` newtype with getters and setters for each field.
//! 3. **Condition Codes:** The `Icc` snapshot consumed by branches and produced by the ALU.

/// Current window pointer field (bits 0-4).
pub const PSR_CWP_MASK: u32 = 0x1F;
/// Enable traps.
pub const PSR_ET: u32 = 1 << 5;
/// Previous supervisor.
pub const PSR_PS: u32 = 1 << 6;
/// Supervisor mode.
pub const PSR_S: u32 = 1 << 7;
/// Processor interrupt level shift.
pub const PSR_PIL_SHIFT: u32 = 8;
/// Processor interrupt level field (bits 8-11).
pub const PSR_PIL_MASK: u32 = 0xF << PSR_PIL_SHIFT;
/// Enable floating point.
pub const PSR_EF: u32 = 1 << 12;
/// Enable coprocessor.
pub const PSR_EC: u32 = 1 << 13;
/// Carry.
pub const PSR_ICC_C: u32 = 1 << 20;
/// Overflow.
pub const PSR_ICC_V: u32 = 1 << 21;
/// Zero.
pub const PSR_ICC_Z: u32 = 1 << 22;
/// Negative.
pub const PSR_ICC_N: u32 = 1 << 23;
/// All four integer condition codes (bits 20-23).
pub const PSR_ICC_MASK: u32 = 0xF << 20;
/// Version and implementation fields (bits 24-31), read-only.
pub const PSR_IMPL_VER_MASK: u32 = 0xFF00_0000;
/// Value of the implementation and version fields on LEON3.
pub const PSR_IMPL_VER: u32 = 0xF300_0000;

/// Bits a WRPSR may change.
///
/// Excludes the implementation and version fields and EF/EC, which are hardwired to 0
/// on a processor without FPU or coprocessor.
pub const PSR_WRITE_MASK: u32 = 0x00FF_CFFF;

/// Integer condition codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Icc {
    /// Negative.
    pub n: bool,
    /// Zero.
    pub z: bool,
    /// Overflow.
    pub v: bool,
    /// Carry.
    pub c: bool,
}

impl Icc {
    /// Packs the flags into their PSR bit positions.
    #[inline]
    pub const fn bits(self) -> u32 {
        (self.n as u32) << 23 | (self.z as u32) << 22 | (self.v as u32) << 21 | (self.c as u32) << 20
    }

    /// Unpacks the flags from a PSR value.
    #[inline]
    pub const fn from_psr(psr: u32) -> Self {
        Self {
            n: psr & PSR_ICC_N != 0,
            z: psr & PSR_ICC_Z != 0,
            v: psr & PSR_ICC_V != 0,
            c: psr & PSR_ICC_C != 0,
        }
    }
}

/// Processor State Register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Psr(pub u32);

impl Psr {
    /// Returns the current window pointer.
    #[inline(always)]
    pub const fn cwp(self) -> usize {
        (self.0 & PSR_CWP_MASK) as usize
    }

    /// Replaces the current window pointer.
    #[inline]
    pub const fn set_cwp(&mut self, cwp: usize) {
        self.0 = (self.0 & !PSR_CWP_MASK) | (cwp as u32 & PSR_CWP_MASK);
    }

    /// Returns `true` if traps are enabled.
    #[inline(always)]
    pub const fn et(self) -> bool {
        self.0 & PSR_ET != 0
    }

    /// Sets the enable-traps bit.
    #[inline]
    pub const fn set_et(&mut self, on: bool) {
        self.set_bit(PSR_ET, on);
    }

    /// Returns the previous-supervisor bit.
    #[inline]
    pub const fn ps(self) -> bool {
        self.0 & PSR_PS != 0
    }

    /// Sets the previous-supervisor bit.
    #[inline]
    pub const fn set_ps(&mut self, on: bool) {
        self.set_bit(PSR_PS, on);
    }

    /// Returns `true` in supervisor mode.
    #[inline(always)]
    pub const fn s(self) -> bool {
        self.0 & PSR_S != 0
    }

    /// Sets the supervisor bit.
    #[inline]
    pub const fn set_s(&mut self, on: bool) {
        self.set_bit(PSR_S, on);
    }

    /// Returns the processor interrupt level.
    #[inline]
    pub const fn pil(self) -> u8 {
        ((self.0 & PSR_PIL_MASK) >> PSR_PIL_SHIFT) as u8
    }

    /// Returns the floating-point enable bit.
    #[inline]
    pub const fn ef(self) -> bool {
        self.0 & PSR_EF != 0
    }

    /// Returns the coprocessor enable bit.
    #[inline]
    pub const fn ec(self) -> bool {
        self.0 & PSR_EC != 0
    }

    /// Returns the integer condition codes.
    #[inline(always)]
    pub const fn icc(self) -> Icc {
        Icc::from_psr(self.0)
    }

    /// Replaces the integer condition codes.
    #[inline(always)]
    pub const fn set_icc(&mut self, icc: Icc) {
        self.0 = (self.0 & !PSR_ICC_MASK) | icc.bits();
    }

    const fn set_bit(&mut self, bit: u32, on: bool) {
        if on {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }
}
