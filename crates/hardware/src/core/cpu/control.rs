//! Control Transfer and Window Instructions.
//!
//! Branches, CALL, JMPL, RETT, Ticc, SAVE and RESTORE. All transfers are delayed:
//! the instruction at NPC (the delay slot) executes before the target unless the
//! annul bit suppresses it.

use super::{Cpu, Effect};
use crate::common::constants::{
    BRANCH_BASE_CYCLES, CALL_LINK_REG, INSTRUCTION_SIZE, JUMP_STALL_CYCLES,
    TRAP_INSTRUCTION_STALL_CYCLES,
};
use crate::common::error::{Exception, SimError};
use crate::isa::{Cond, Operand};

/// Software trap numbers are 7 bits wide.
const SW_TRAP_NUMBER_MASK: u32 = 0x7F;

impl Cpu {
    /// Bicc.
    ///
    /// A taken branch executes its delay slot; `ba,a` annuls it. An untaken branch
    /// with the annul bit set skips the delay slot.
    pub(crate) fn execute_branch(&mut self, cond: Cond, annul: bool, disp22: i32) -> Effect {
        self.stall(BRANCH_BASE_CYCLES);
        let target = self.pc.wrapping_add_signed(disp22.wrapping_mul(4));
        let npc = self.npc;

        if cond == Cond::Always && annul {
            self.stats.annulled += 1;
            return Effect::Transfer {
                pc: target,
                npc: target.wrapping_add(INSTRUCTION_SIZE),
            };
        }
        if cond.evaluate(self.psr.icc()) {
            return Effect::Transfer { pc: npc, npc: target };
        }
        if annul {
            self.stats.annulled += 1;
            return Effect::Transfer {
                pc: npc.wrapping_add(INSTRUCTION_SIZE),
                npc: npc.wrapping_add(2 * INSTRUCTION_SIZE),
            };
        }
        Effect::Advance
    }

    /// CALL: `%o7` receives the address of the CALL itself.
    pub(crate) fn execute_call(&mut self, disp30: u32) -> Effect {
        self.regs.write(CALL_LINK_REG, self.pc);
        Effect::Transfer {
            pc: self.npc,
            npc: self.pc.wrapping_add(disp30 << 2),
        }
    }

    /// JMPL: jumps to `r[rs1] + op2`, linking the address of the JMPL into `rd`.
    pub(crate) fn execute_jmpl(
        &mut self,
        rd: usize,
        rs1: usize,
        op2: Operand,
    ) -> Result<Effect, SimError> {
        let target = self.effective_address(rs1, op2);
        if target & 3 != 0 {
            return self.trap(Exception::MemAddrNotAligned);
        }
        self.regs.write(rd, self.pc);
        self.stall(JUMP_STALL_CYCLES);
        Ok(Effect::Transfer {
            pc: self.npc,
            npc: target,
        })
    }

    /// RETT: returns from a trap handler.
    ///
    /// Requires ET clear and S set; restores the window above, sets `S = PS` and
    /// re-enables traps.
    ///
    /// # Errors
    ///
    /// `SimError::RettInvariant` if traps are disabled but the processor is in user
    /// mode, the restored window is invalid, or the target is misaligned. With traps
    /// disabled these cannot be delivered, so the processor halts.
    pub(crate) fn execute_rett(&mut self, rs1: usize, op2: Operand) -> Result<Effect, SimError> {
        let target = self.effective_address(rs1, op2);
        let new_cwp = (self.psr.cwp() + 1) % self.num_windows();
        let supervisor = self.psr.s();

        if self.psr.et() {
            let exception = if supervisor {
                Exception::IllegalInstruction
            } else {
                Exception::PrivilegedInstruction
            };
            return self.trap(exception);
        }
        if !supervisor || self.window_invalid(new_cwp) || target & 3 != 0 {
            tracing::error!(
                pc = format_args!("{:#010x}", self.pc),
                supervisor,
                new_cwp,
                target = format_args!("{target:#010x}"),
                "RETT with traps disabled cannot complete"
            );
            return Err(SimError::RettInvariant {
                pc: self.pc,
                supervisor,
                new_cwp: new_cwp as u32,
                target,
            });
        }

        self.set_cwp(new_cwp);
        let previous = self.psr.ps();
        self.psr.set_s(previous);
        self.psr.set_et(true);
        self.stall(JUMP_STALL_CYCLES);
        Ok(Effect::Transfer {
            pc: self.npc,
            npc: target,
        })
    }

    /// Ticc: raises TRAP_INSTRUCTION with trap number `(r[rs1] + op2) & 0x7F`.
    ///
    /// With `stop_on_ta` set, an always-true Ticc halts the run instead, using `%o0`
    /// as the exit code.
    pub(crate) fn execute_ticc(
        &mut self,
        cond: Cond,
        rs1: usize,
        op2: Operand,
    ) -> Result<Effect, SimError> {
        if !cond.evaluate(self.psr.icc()) {
            return Ok(Effect::Advance);
        }
        if self.stop_on_ta && cond == Cond::Always {
            return Ok(Effect::Halt(self.exit_register()));
        }
        self.stall(TRAP_INSTRUCTION_STALL_CYCLES);
        let number = self.effective_address(rs1, op2) & SW_TRAP_NUMBER_MASK;
        self.trap_with_offset(Exception::TrapInstruction, number)
    }

    /// SAVE: `rd` in the new window receives `r[rs1] + op2` from the old one.
    pub(crate) fn execute_save(
        &mut self,
        rd: usize,
        rs1: usize,
        op2: Operand,
    ) -> Result<Effect, SimError> {
        let value = self.effective_address(rs1, op2);
        if let Err(exception) = self.decrement_window() {
            return self.trap(exception);
        }
        self.regs.write(rd, value);
        Ok(Effect::Advance)
    }

    /// RESTORE: `rd` in the restored window receives `r[rs1] + op2` from the old one.
    pub(crate) fn execute_restore(
        &mut self,
        rd: usize,
        rs1: usize,
        op2: Operand,
    ) -> Result<Effect, SimError> {
        let value = self.effective_address(rs1, op2);
        if let Err(exception) = self.increment_window() {
            return self.trap(exception);
        }
        self.regs.write(rd, value);
        Ok(Effect::Advance)
    }
}
