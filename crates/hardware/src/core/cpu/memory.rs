//! Memory Access Instructions.
//!
//! This module implements the load, store and atomic instructions. It performs the following:
//! 1. **Address Space Selection:** Supervisor/user data ASIs, or the instruction's ASI for
//!    the alternate forms, which are privileged.
//! 2. **Alignment:** Halfword, word and doubleword alignment checks before any access.
//! 3. **Register Pairs:** LDD/STD move the even/odd pair; the even register maps to the
//!    word at the lower address.
//! 4. **Fault Mapping:** A failed access becomes DATA_ACCESS_ERROR.

use super::{Cpu, Effect};
use crate::common::constants::{ATOMIC_STALL_CYCLES, SINGLE_STALL_CYCLES, STORE_DOUBLE_STALL_CYCLES};
use crate::common::data::{AccessType, Asi, DataAccess};
use crate::common::error::{Exception, MemoryError, SimError};
use crate::isa::Operand;
use crate::isa::decode::{AtomicOp, LoadOp, StoreOp};

/// Value LDSTUB leaves in memory.
const LDSTUB_SET: u8 = 0xFF;

impl Cpu {
    /// Resolves the ASI of a data access.
    ///
    /// # Errors
    ///
    /// `PrivilegedInstruction` for an alternate-space access in user mode.
    fn data_asi(&self, explicit: Option<u8>) -> Result<Asi, Exception> {
        match explicit {
            Some(_) if !self.psr.s() => Err(Exception::PrivilegedInstruction),
            Some(asi) => Ok(Asi(asi)),
            None => Ok(Asi::data(self.psr.s())),
        }
    }

    /// Computes and validates the address of a data access of `size` bytes.
    ///
    /// The privilege check of the alternate forms precedes the alignment check.
    fn data_address(
        &self,
        rs1: usize,
        op2: Operand,
        size: u32,
        asi: Option<u8>,
    ) -> Result<(u32, Asi), Exception> {
        let addr = self.effective_address(rs1, op2);
        let asi = self.data_asi(asi)?;
        if addr & (size - 1) != 0 {
            return Err(Exception::MemAddrNotAligned);
        }
        Ok((addr, asi))
    }

    fn record_access(&mut self, addr: u32, size: u32, kind: AccessType) {
        self.last_data_access = Some(DataAccess { addr, size, kind });
    }

    fn data_access_error(&mut self, err: &MemoryError) -> Result<Effect, SimError> {
        tracing::warn!(pc = format_args!("{:#010x}", self.pc), %err, "data access failed");
        self.trap(Exception::DataAccessError)
    }

    /// LDSB/LDSH/LDUB/LDUH/LD/LDD and their alternate-space forms.
    pub(crate) fn execute_load(
        &mut self,
        op: LoadOp,
        rd: usize,
        rs1: usize,
        op2: Operand,
        asi: Option<u8>,
    ) -> Result<Effect, SimError> {
        let size = op.size();
        let (addr, asi) = match self.data_address(rs1, op2, size, asi) {
            Ok(resolved) => resolved,
            Err(exception) => return self.trap(exception),
        };
        self.record_access(addr, size, AccessType::Read);

        let loaded = match op {
            LoadOp::Ldsb => self
                .memory
                .read_byte(addr, asi)
                .map(|b| i32::from(b as i8) as u32),
            LoadOp::Ldub => self.memory.read_byte(addr, asi).map(u32::from),
            LoadOp::Ldsh => self
                .memory
                .read_half(addr, asi)
                .map(|h| i32::from(h as i16) as u32),
            LoadOp::Lduh => self.memory.read_half(addr, asi).map(u32::from),
            LoadOp::Ld => self.memory.read_word(addr, asi),
            LoadOp::Ldd => {
                self.stall(SINGLE_STALL_CYCLES);
                match self.memory.read_dword(addr, asi) {
                    Ok(pair) => {
                        self.regs.write(rd & !1, (pair >> 32) as u32);
                        self.regs.write(rd | 1, pair as u32);
                        return Ok(Effect::Advance);
                    }
                    Err(err) => return self.data_access_error(&err),
                }
            }
        };

        match loaded {
            Ok(value) => {
                self.regs.write(rd, value);
                Ok(Effect::Advance)
            }
            Err(err) => self.data_access_error(&err),
        }
    }

    /// STB/STH/ST/STD and their alternate-space forms.
    pub(crate) fn execute_store(
        &mut self,
        op: StoreOp,
        rd: usize,
        rs1: usize,
        op2: Operand,
        asi: Option<u8>,
    ) -> Result<Effect, SimError> {
        let size = op.size();
        let (addr, asi) = match self.data_address(rs1, op2, size, asi) {
            Ok(resolved) => resolved,
            Err(exception) => return self.trap(exception),
        };
        self.record_access(addr, size, AccessType::Write);

        let value = self.regs.read(rd);
        let stored = match op {
            StoreOp::Stb => {
                self.stall(SINGLE_STALL_CYCLES);
                self.memory.write_byte(addr, value as u8, asi)
            }
            StoreOp::Sth => {
                self.stall(SINGLE_STALL_CYCLES);
                self.memory.write_half(addr, value as u16, asi)
            }
            StoreOp::St => {
                self.stall(SINGLE_STALL_CYCLES);
                self.memory.write_word(addr, value, asi)
            }
            StoreOp::Std => {
                self.stall(STORE_DOUBLE_STALL_CYCLES);
                let pair = (u64::from(self.regs.read(rd & !1)) << 32)
                    | u64::from(self.regs.read(rd | 1));
                self.memory.write_dword(addr, pair, asi)
            }
        };

        match stored {
            Ok(()) => Ok(Effect::Advance),
            Err(err) => self.data_access_error(&err),
        }
    }

    /// LDSTUB and SWAP and their alternate-space forms.
    pub(crate) fn execute_atomic(
        &mut self,
        op: AtomicOp,
        rd: usize,
        rs1: usize,
        op2: Operand,
        asi: Option<u8>,
    ) -> Result<Effect, SimError> {
        let size = match op {
            AtomicOp::Ldstub => 1,
            AtomicOp::Swap => 4,
        };
        let (addr, asi) = match self.data_address(rs1, op2, size, asi) {
            Ok(resolved) => resolved,
            Err(exception) => return self.trap(exception),
        };
        self.stall(ATOMIC_STALL_CYCLES);
        self.record_access(addr, size, AccessType::Write);

        let exchanged = match op {
            AtomicOp::Ldstub => self.memory.read_byte(addr, asi).and_then(|old| {
                self.memory.write_byte(addr, LDSTUB_SET, asi)?;
                Ok(u32::from(old))
            }),
            AtomicOp::Swap => {
                let new = self.regs.read(rd);
                self.memory.read_word(addr, asi).and_then(|old| {
                    self.memory.write_word(addr, new, asi)?;
                    Ok(old)
                })
            }
        };

        match exchanged {
            Ok(old) => {
                self.regs.write(rd, old);
                Ok(Effect::Advance)
            }
            Err(err) => self.data_access_error(&err),
        }
    }
}
