//! Trap Handling Logic.
//!
//! This module implements exception dispatch and register-window rotation. It performs
//! the following:
//! 1. **Trap Dispatch:** Vectors PC/NPC through TBR, saving the trapped PC/NPC in the new window.
//! 2. **Error Mode:** Detects precise traps raised with ET clear, which halt the processor.
//! 3. **Window Rotation:** SAVE/RESTORE-style CWP moves checked against WIM.
//! 4. **Interrupts:** Selects a pending external interrupt and acknowledges it when taken.

use super::{Cpu, Effect};
use crate::common::constants::{RESET_VECTOR, TRAP_NPC_REG, TRAP_PC_REG};
use crate::common::error::{Exception, SimError};
use crate::core::arch::trap::TrapTable;

impl Cpu {
    /// Raises an exception on behalf of the executing instruction.
    ///
    /// With traps enabled the processor enters the trap window: `PS = S`, `S = 1`,
    /// `ET = 0`, CWP moves one window down without a WIM check, `%l1`/`%l2` of the
    /// new window receive PC/NPC, and TT is set from the trap table. PC and NPC are
    /// vectored to TBR (address 0 for RESET). Taking an external interrupt drives
    /// the acknowledge output with its level.
    ///
    /// # Arguments
    ///
    /// * `exception` - The exception to raise.
    /// * `offset` - Software trap number for TRAP_INSTRUCTION (7 bits) and the
    ///   implementation-dependent offset; ignored otherwise.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the trap was taken, `Ok(false)` if it was ignored because
    /// traps are disabled and the exception is an interrupt.
    ///
    /// # Errors
    ///
    /// `SimError::ErrorMode` for a precise exception raised with traps disabled.
    pub fn raise_exception(&mut self, exception: Exception, offset: u32) -> Result<bool, SimError> {
        if !self.psr.et() {
            if exception.is_precise() {
                let mnemonic = self
                    .current
                    .map_or_else(|| "<fetch>".to_string(), |inst| inst.mnemonic(self.pc));
                tracing::error!(
                    %exception,
                    pc = format_args!("{:#010x}", self.pc),
                    "trap with ET=0, entering error mode"
                );
                return Err(SimError::ErrorMode {
                    exception,
                    pc: self.pc,
                    mnemonic,
                });
            }
            tracing::debug!(%exception, "exception ignored, traps disabled");
            return Ok(false);
        }

        let (pc, npc) = (self.pc, self.npc);
        let supervisor = self.psr.s();
        self.psr.set_ps(supervisor);
        self.psr.set_s(true);
        self.psr.set_et(false);
        let cwp = (self.psr.cwp() + self.num_windows() - 1) % self.num_windows();
        self.set_cwp(cwp);
        self.regs.write(TRAP_PC_REG, pc);
        self.regs.write(TRAP_NPC_REG, npc);

        match TrapTable::trap_type(exception, offset) {
            Some(tt) => {
                self.tbr = TrapTable::with_trap_type(self.tbr, tt);
                self.pc = self.tbr;
                self.npc = self.tbr.wrapping_add(4);
            }
            None => {
                self.pc = RESET_VECTOR;
                self.npc = RESET_VECTOR + 4;
            }
        }

        self.stats.traps_taken += 1;
        tracing::debug!(
            %exception,
            tt = format_args!("{:#04x}", TrapTable::trap_type_of(self.tbr)),
            pc = format_args!("{pc:#010x}"),
            cwp,
            "trap taken"
        );

        if let Some(level) = exception.interrupt_level() {
            self.stats.interrupts_taken += 1;
            self.irq_ack.acknowledge(level);
        }
        Ok(true)
    }

    /// Raises `exception` and reports it as the instruction's effect.
    #[inline]
    pub(crate) fn trap(&mut self, exception: Exception) -> Result<Effect, SimError> {
        self.trap_with_offset(exception, 0)
    }

    /// Raises `exception` with a trap offset and reports it as the instruction's effect.
    pub(crate) fn trap_with_offset(
        &mut self,
        exception: Exception,
        offset: u32,
    ) -> Result<Effect, SimError> {
        self.raise_exception(exception, offset)?;
        Ok(Effect::Trapped(exception))
    }

    /// Sets CWP and rebinds the window aliases.
    pub fn set_cwp(&mut self, cwp: usize) {
        self.psr.set_cwp(cwp);
        self.regs.bind_window(cwp);
    }

    /// Returns `true` if `window` is marked invalid in WIM.
    #[inline]
    pub const fn window_invalid(&self, window: usize) -> bool {
        (self.wim >> window) & 1 != 0
    }

    /// Moves to the previous window (CWP - 1), as SAVE does.
    ///
    /// # Errors
    ///
    /// `Exception::WindowOverflow` if the target window is invalid; nothing changes.
    pub fn decrement_window(&mut self) -> Result<(), Exception> {
        let n = self.num_windows();
        let new_cwp = (self.psr.cwp() + n - 1) % n;
        if self.window_invalid(new_cwp) {
            return Err(Exception::WindowOverflow);
        }
        self.set_cwp(new_cwp);
        Ok(())
    }

    /// Moves to the next window (CWP + 1), as RESTORE does.
    ///
    /// # Errors
    ///
    /// `Exception::WindowUnderflow` if the target window is invalid; nothing changes.
    pub fn increment_window(&mut self) -> Result<(), Exception> {
        let new_cwp = (self.psr.cwp() + 1) % self.num_windows();
        if self.window_invalid(new_cwp) {
            return Err(Exception::WindowUnderflow);
        }
        self.set_cwp(new_cwp);
        Ok(())
    }

    /// Returns the pending interrupt level if it is taken under the current PSR.
    pub fn pending_interrupt(&self) -> Option<u8> {
        self.pending_irq
            .filter(|&level| TrapTable::interrupt_enabled(self.psr, level))
    }

    /// Executes the synthetic interrupt instruction for `level`.
    pub(crate) fn execute_interrupt(&mut self, level: u8) -> Result<Effect, SimError> {
        let id = Exception::ImplDependent.id().saturating_sub(level);
        let exception = Exception::from_id(id).unwrap_or(Exception::ImplDependent);
        if self.pending_irq == Some(level) {
            self.pending_irq = None;
        }
        self.trap(exception)
    }
}
