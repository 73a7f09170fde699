//! Main Memory (RAM).
//!
//! This module implements the RAM region the simulated program runs from. It provides:
//! 1. **Storage:** A zero-initialized byte buffer mapped at a base address.
//! 2. **Access:** The big-endian `Memory` interface; every address space sees the same bytes.
//! 3. **Bounds:** Accesses outside the region fail with a `MemoryError` instead of panicking.

use crate::common::data::Asi;
use crate::common::error::MemoryError;
use crate::soc::traits::Memory;

/// Flat RAM region.
#[derive(Clone)]
pub struct Ram {
    base: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for Ram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ram")
            .field("base", &format_args!("{:#010x}", self.base))
            .field("size", &self.data.len())
            .finish()
    }
}

impl Ram {
    /// Creates a zeroed RAM region.
    ///
    /// # Arguments
    ///
    /// * `base` - First address of the region.
    /// * `size` - Size in bytes.
    pub fn new(base: u32, size: u32) -> Self {
        Self {
            base,
            data: vec![0; size as usize],
        }
    }

    /// Returns `(base, size)` of the region.
    pub fn address_range(&self) -> (u32, u32) {
        (self.base, self.data.len() as u32)
    }

    /// Returns `true` if `[addr, addr + len)` lies inside the region.
    pub fn contains(&self, addr: u32, len: u32) -> bool {
        self.offset(addr, len).is_ok()
    }

    fn offset(&self, addr: u32, len: u32) -> Result<usize, MemoryError> {
        let off = addr.wrapping_sub(self.base) as usize;
        if addr < self.base || off >= self.data.len() {
            return Err(MemoryError::Unmapped {
                addr,
                asi: Asi::SUPERVISOR_DATA,
            });
        }
        if off + len as usize > self.data.len() {
            return Err(MemoryError::OutOfRange { addr, size: len });
        }
        Ok(off)
    }

    fn slice<const N: usize>(&self, addr: u32, asi: Asi) -> Result<[u8; N], MemoryError> {
        let off = self.offset(addr, N as u32).map_err(|e| with_asi(e, asi))?;
        let mut out = [0; N];
        out.copy_from_slice(&self.data[off..off + N]);
        Ok(out)
    }

    fn store(&mut self, addr: u32, bytes: &[u8], asi: Asi) -> Result<(), MemoryError> {
        let off = self
            .offset(addr, bytes.len() as u32)
            .map_err(|e| with_asi(e, asi))?;
        self.data[off..off + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

fn with_asi(err: MemoryError, asi: Asi) -> MemoryError {
    match err {
        MemoryError::Unmapped { addr, .. } => MemoryError::Unmapped { addr, asi },
        other => other,
    }
}

impl Memory for Ram {
    fn read_byte(&mut self, addr: u32, asi: Asi) -> Result<u8, MemoryError> {
        Ok(self.slice::<1>(addr, asi)?[0])
    }

    fn read_half(&mut self, addr: u32, asi: Asi) -> Result<u16, MemoryError> {
        Ok(u16::from_be_bytes(self.slice(addr, asi)?))
    }

    fn read_word(&mut self, addr: u32, asi: Asi) -> Result<u32, MemoryError> {
        Ok(u32::from_be_bytes(self.slice(addr, asi)?))
    }

    fn read_dword(&mut self, addr: u32, asi: Asi) -> Result<u64, MemoryError> {
        Ok(u64::from_be_bytes(self.slice(addr, asi)?))
    }

    fn write_byte(&mut self, addr: u32, val: u8, asi: Asi) -> Result<(), MemoryError> {
        self.store(addr, &[val], asi)
    }

    fn write_half(&mut self, addr: u32, val: u16, asi: Asi) -> Result<(), MemoryError> {
        self.store(addr, &val.to_be_bytes(), asi)
    }

    fn write_word(&mut self, addr: u32, val: u32, asi: Asi) -> Result<(), MemoryError> {
        self.store(addr, &val.to_be_bytes(), asi)
    }

    fn write_dword(&mut self, addr: u32, val: u64, asi: Asi) -> Result<(), MemoryError> {
        self.store(addr, &val.to_be_bytes(), asi)
    }

    fn read_bytes(&mut self, addr: u32, len: usize) -> Result<Vec<u8>, MemoryError> {
        let off = self.offset(addr, len as u32)?;
        Ok(self.data[off..off + len].to_vec())
    }

    fn write_bytes(&mut self, addr: u32, data: &[u8]) -> Result<(), MemoryError> {
        self.store(addr, data, Asi::SUPERVISOR_DATA)
    }
}
