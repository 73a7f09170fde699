//! Trap Table Utilities.
//!
//! This module maps exceptions onto the SPARC trap table. It performs the following:
//! 1. **Trap Types:** Converts an exception (and its software offset) into the 8-bit `tt` value.
//! 2. **Vector Addresses:** Composes and decomposes the Trap Base Register.
//! 3. **Interrupt Selection:** Decides whether a pending interrupt level may be taken.

use crate::common::error::Exception;
use crate::core::arch::psr::Psr;

/// Trap base address field of `%tbr` (bits 12-31).
pub const TBR_TBA_MASK: u32 = 0xFFFF_F000;
/// Trap type field of `%tbr` (bits 4-11).
pub const TBR_TT_MASK: u32 = 0x0000_0FF0;
/// Shift of the trap type field.
pub const TBR_TT_SHIFT: u32 = 4;

/// Base trap type of Ticc software traps.
pub const TT_TRAP_INSTRUCTION_BASE: u32 = 0x80;
/// Base trap type of implementation-dependent exceptions.
pub const TT_IMPL_DEPENDENT_BASE: u32 = 0x60;
/// Interrupt level that cannot be masked by PIL.
pub const NON_MASKABLE_LEVEL: u8 = 15;

/// Trap table helper functions.
#[derive(Debug)]
pub struct TrapTable;

impl TrapTable {
    /// Returns the trap type written into `%tbr` for an exception.
    ///
    /// # Arguments
    ///
    /// * `exception` - The exception being taken.
    /// * `offset` - Software trap number for Ticc, or the implementation-dependent offset.
    ///
    /// # Returns
    ///
    /// The 8-bit trap type, or `None` for RESET, which vectors to address 0 instead.
    pub fn trap_type(exception: Exception, offset: u32) -> Option<u32> {
        let tt = match exception {
            Exception::Reset => return None,
            Exception::DataStoreError => 0x2b,
            Exception::InstrAccessMmuMiss => 0x3c,
            Exception::InstrAccessError => 0x21,
            Exception::RRegisterAccessError => 0x20,
            Exception::InstrAccessException => 0x01,
            Exception::PrivilegedInstruction => 0x03,
            Exception::IllegalInstruction => 0x02,
            Exception::FpDisabled => 0x04,
            Exception::CpDisabled => 0x24,
            Exception::UnimplementedFlush => 0x25,
            Exception::WatchpointDetected => 0x0b,
            Exception::WindowOverflow => 0x05,
            Exception::WindowUnderflow => 0x06,
            Exception::MemAddrNotAligned => 0x07,
            Exception::FpException => 0x08,
            Exception::CpException => 0x28,
            Exception::DataAccessError => 0x29,
            Exception::DataAccessMmuMiss => 0x2c,
            Exception::DataAccessException => 0x09,
            Exception::TagOverflow => 0x0a,
            Exception::DivisionByZero => 0x2a,
            Exception::TrapInstruction => TT_TRAP_INSTRUCTION_BASE + (offset & 0x7f),
            Exception::ImplDependent => TT_IMPL_DEPENDENT_BASE + (offset & 0x1f),
            irq => 0x10 + u32::from(irq.interrupt_level().unwrap_or(0)),
        };
        Some(tt)
    }

    /// Replaces the trap type field of a TBR value.
    #[inline]
    pub const fn with_trap_type(tbr: u32, tt: u32) -> u32 {
        (tbr & !TBR_TT_MASK) | ((tt << TBR_TT_SHIFT) & TBR_TT_MASK)
    }

    /// Extracts the trap type field of a TBR value.
    #[inline]
    pub const fn trap_type_of(tbr: u32) -> u32 {
        (tbr & TBR_TT_MASK) >> TBR_TT_SHIFT
    }

    /// Returns `true` if an interrupt of `level` is taken under `psr`.
    ///
    /// Interrupts require ET; level 15 is taken regardless of PIL, lower levels only
    /// when they exceed it.
    pub const fn interrupt_enabled(psr: Psr, level: u8) -> bool {
        psr.et() && (level == NON_MASKABLE_LEVEL || level > psr.pil())
    }
}
