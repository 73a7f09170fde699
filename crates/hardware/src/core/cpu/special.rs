//! Special register access: RDY/RDASR/RDPSR/RDWIM/RDTBR and their WR counterparts.

use super::{Cpu, Effect};
use crate::common::error::{Exception, SimError};
use crate::core::arch::psr::{PSR_IMPL_VER, PSR_WRITE_MASK, Psr};
use crate::core::arch::trap::{TBR_TBA_MASK, TBR_TT_MASK};
use crate::isa::Operand;
use crate::isa::decode::SpecialReg;

impl Cpu {
    /// Mask of the WIM bits that name an implemented window.
    pub const fn wim_mask(&self) -> u32 {
        u32::MAX >> (32 - self.regs.num_windows())
    }

    pub(crate) fn execute_read_special(
        &mut self,
        reg: SpecialReg,
        rd: usize,
    ) -> Result<Effect, SimError> {
        if reg.is_privileged() && !self.psr.s() {
            return self.trap(Exception::PrivilegedInstruction);
        }
        let value = match reg {
            SpecialReg::Y => self.y,
            SpecialReg::Psr => self.psr.0,
            SpecialReg::Wim => self.wim,
            SpecialReg::Tbr => self.tbr,
            SpecialReg::Asr(n) => self.asr[n],
        };
        self.regs.write(rd, value);
        Ok(Effect::Advance)
    }

    /// Writes `r[rs1] ^ op2` to a special register.
    ///
    /// PSR writes keep the implementation/version byte and clear EF/EC; a CWP
    /// beyond the implemented windows is illegal. TBR writes only replace TBA.
    pub(crate) fn execute_write_special(
        &mut self,
        reg: SpecialReg,
        rs1: usize,
        op2: Operand,
    ) -> Result<Effect, SimError> {
        if reg.is_privileged() && !self.psr.s() {
            return self.trap(Exception::PrivilegedInstruction);
        }
        let value = self.regs.read(rs1) ^ self.operand(op2);
        match reg {
            SpecialReg::Y => self.y = value,
            SpecialReg::Asr(n) => self.asr[n] = value,
            SpecialReg::Psr => {
                let psr = Psr((value & PSR_WRITE_MASK) | PSR_IMPL_VER);
                if psr.cwp() >= self.num_windows() {
                    return self.trap(Exception::IllegalInstruction);
                }
                self.psr = psr;
                self.regs.bind_window(psr.cwp());
            }
            SpecialReg::Wim => self.wim = value & self.wim_mask(),
            SpecialReg::Tbr => self.tbr = (self.tbr & TBR_TT_MASK) | (value & TBR_TBA_MASK),
        }
        Ok(Effect::Advance)
    }
}
