//! Memory and interrupt interfaces of the integer unit.
//!
//! This module defines the two narrow interfaces through which the processor reaches
//! the rest of the platform. It provides:
//! 1. **Memory:** Byte, half, word, and doubleword read/write with an address space identifier.
//! 2. **Interrupt Acknowledge:** The fire-and-forget pin driven when an external interrupt is taken.
//!
//! Multi-byte values are big-endian on the bus, as on every SPARC target. Failed accesses
//! return a `MemoryError`; the CPU decides which trap that becomes.

use crate::common::data::Asi;
use crate::common::error::MemoryError;

/// Memory interface used by instruction fetch and every load and store.
///
/// Implementors must return `Err` rather than panic for accesses they cannot service.
/// Alignment has already been checked by the CPU when these are called.
pub trait Memory: Send {
    /// Reads one byte.
    fn read_byte(&mut self, addr: u32, asi: Asi) -> Result<u8, MemoryError>;
    /// Reads a big-endian halfword.
    fn read_half(&mut self, addr: u32, asi: Asi) -> Result<u16, MemoryError>;
    /// Reads a big-endian word.
    fn read_word(&mut self, addr: u32, asi: Asi) -> Result<u32, MemoryError>;
    /// Writes one byte.
    fn write_byte(&mut self, addr: u32, val: u8, asi: Asi) -> Result<(), MemoryError>;
    /// Writes a big-endian halfword.
    fn write_half(&mut self, addr: u32, val: u16, asi: Asi) -> Result<(), MemoryError>;
    /// Writes a big-endian word.
    fn write_word(&mut self, addr: u32, val: u32, asi: Asi) -> Result<(), MemoryError>;

    /// Reads a big-endian doubleword: the word at `addr` forms the high half.
    fn read_dword(&mut self, addr: u32, asi: Asi) -> Result<u64, MemoryError> {
        let hi = self.read_word(addr, asi)?;
        let lo = self.read_word(addr.wrapping_add(4), asi)?;
        Ok((u64::from(hi) << 32) | u64::from(lo))
    }

    /// Writes a big-endian doubleword: the high half goes to `addr`.
    fn write_dword(&mut self, addr: u32, val: u64, asi: Asi) -> Result<(), MemoryError> {
        self.write_word(addr, (val >> 32) as u32, asi)?;
        self.write_word(addr.wrapping_add(4), val as u32, asi)
    }

    /// Reads `len` consecutive bytes in supervisor data space (debugger and loader access).
    fn read_bytes(&mut self, addr: u32, len: usize) -> Result<Vec<u8>, MemoryError> {
        (0..len)
            .map(|i| self.read_byte(addr.wrapping_add(i as u32), Asi::SUPERVISOR_DATA))
            .collect()
    }

    /// Writes a contiguous byte slice in supervisor data space (default: byte-by-byte).
    fn write_bytes(&mut self, addr: u32, data: &[u8]) -> Result<(), MemoryError> {
        for (i, byte) in data.iter().enumerate() {
            self.write_byte(addr.wrapping_add(i as u32), *byte, Asi::SUPERVISOR_DATA)?;
        }
        Ok(())
    }
}

/// Interrupt acknowledge output of the processor.
pub trait IrqAck: Send {
    /// Signals that an external interrupt of `level` (1-15) has been taken.
    fn acknowledge(&mut self, level: u8);
}
