//! Main Execution Loop.
//!
//! This module implements the instruction cycle of the CPU. It performs the following:
//! 1. **Interrupt Injection:** Replaces the fetch with the synthetic interrupt instruction
//!    when an enabled interrupt is pending.
//! 2. **Fetch and Decode:** Reads the word at PC and decodes it exactly once.
//! 3. **Dispatch:** Routes the decoded instruction to its execution routine.
//! 4. **Retirement:** Applies the PC/NPC update, charges cycles and updates statistics.
//! 5. **Integer Operate:** Arithmetic, logic, shift, tagged, multiply, divide and MAC.

use super::{Cpu, Effect, StepOutcome};
use crate::common::constants::{
    ASR_MAC_ACCUMULATOR, DIVIDE_STALL_CYCLES, INSTRUCTION_SIZE, SINGLE_STALL_CYCLES,
};
use crate::common::data::Asi;
use crate::common::error::{Exception, SimError};
use crate::core::timing::TimingModel;
use crate::core::units::alu::{Alu, AluOp, logic, muldiv};
use crate::isa::{Instruction, Operand, decode};

impl Cpu {
    /// Executes one instruction (or takes one pending interrupt).
    ///
    /// # Returns
    ///
    /// What was executed, the cycles charged and the exception raised, if any.
    ///
    /// # Errors
    ///
    /// Fatal conditions: an undecodable word, a precise trap with ET clear, or an
    /// inconsistent RETT.
    pub fn step(&mut self) -> Result<StepOutcome, SimError> {
        self.stall_cycles = 0;
        self.last_data_access = None;
        let pc = self.pc;
        let supervisor = self.psr.s();

        let inst = match self.pending_interrupt() {
            Some(level) => Instruction::Interrupt { level },
            None => match self.memory.read_word(pc, Asi::instruction(supervisor)) {
                Ok(word) => {
                    let inst = decode(word).ok_or(SimError::InvalidInstruction { word, pc })?;
                    if self.trace {
                        tracing::trace!(
                            pc = format_args!("{pc:#010x}"),
                            word = format_args!("{word:#010x}"),
                            "{}",
                            inst.mnemonic(pc)
                        );
                    }
                    inst
                }
                Err(err) => {
                    tracing::warn!(pc = format_args!("{pc:#010x}"), %err, "instruction fetch failed");
                    self.current = None;
                    self.raise_exception(Exception::InstrAccessError, 0)?;
                    return Ok(self.retire(pc, None, supervisor, Some(Exception::InstrAccessError)));
                }
            },
        };

        self.current = Some(inst);
        let effect = self.execute(inst)?;
        let trap = match effect {
            Effect::Advance => {
                self.pc = self.npc;
                self.npc = self.npc.wrapping_add(INSTRUCTION_SIZE);
                None
            }
            Effect::Transfer { pc, npc } => {
                self.pc = pc;
                self.npc = npc;
                None
            }
            Effect::Trapped(exception) => Some(exception),
            Effect::Halt(code) => {
                tracing::info!(code, pc = format_args!("{pc:#010x}"), "program halted");
                self.exit_code = Some(code);
                None
            }
        };
        Ok(self.retire(pc, Some(inst), supervisor, trap))
    }

    fn retire(
        &mut self,
        pc: u32,
        instruction: Option<Instruction>,
        supervisor: bool,
        trap: Option<Exception>,
    ) -> StepOutcome {
        let cycles = self.timing.instruction_cycles(self.stall_cycles);
        self.stats.record_cycles(cycles, supervisor);
        self.stats.stall_cycles += u64::from(self.stall_cycles);
        if let Some(inst) = &instruction {
            self.stats.record_instruction(inst);
        }
        StepOutcome {
            pc,
            instruction,
            cycles,
            trap,
        }
    }

    /// Executes a decoded instruction against the current state.
    ///
    /// PC/NPC are left untouched unless the instruction traps; the returned
    /// `Effect` tells the caller how to advance them.
    ///
    /// # Errors
    ///
    /// Fatal simulation conditions only; architectural exceptions are taken and
    /// reported as `Effect::Trapped`.
    pub fn execute(&mut self, inst: Instruction) -> Result<Effect, SimError> {
        match inst {
            Instruction::Alu {
                op,
                cc,
                rd,
                rs1,
                op2,
            } => self.execute_alu(op, cc, rd, rs1, op2),
            Instruction::Sethi { rd, imm22 } => {
                self.regs.write(rd, imm22 << 10);
                Ok(Effect::Advance)
            }
            Instruction::Branch {
                cond,
                annul,
                disp22,
            } => Ok(self.execute_branch(cond, annul, disp22)),
            Instruction::Call { disp30 } => Ok(self.execute_call(disp30)),
            Instruction::Jmpl { rd, rs1, op2 } => self.execute_jmpl(rd, rs1, op2),
            Instruction::Rett { rs1, op2 } => self.execute_rett(rs1, op2),
            Instruction::Ticc { cond, rs1, op2 } => self.execute_ticc(cond, rs1, op2),
            Instruction::Save { rd, rs1, op2 } => self.execute_save(rd, rs1, op2),
            Instruction::Restore { rd, rs1, op2 } => self.execute_restore(rd, rs1, op2),
            Instruction::Load {
                op,
                rd,
                rs1,
                op2,
                asi,
            } => self.execute_load(op, rd, rs1, op2, asi),
            Instruction::Store {
                op,
                rd,
                rs1,
                op2,
                asi,
            } => self.execute_store(op, rd, rs1, op2, asi),
            Instruction::Atomic {
                op,
                rd,
                rs1,
                op2,
                asi,
            } => self.execute_atomic(op, rd, rs1, op2, asi),
            Instruction::ReadSpecial { reg, rd } => self.execute_read_special(reg, rd),
            Instruction::WriteSpecial { reg, rs1, op2 } => {
                self.execute_write_special(reg, rs1, op2)
            }
            Instruction::Stbar | Instruction::Flush { .. } => Ok(Effect::Advance),
            Instruction::Unimp { .. } => self.trap(Exception::IllegalInstruction),
            Instruction::Interrupt { level } => self.execute_interrupt(level),
        }
    }

    fn execute_alu(
        &mut self,
        op: AluOp,
        cc: bool,
        rd: usize,
        rs1: usize,
        op2: Operand,
    ) -> Result<Effect, SimError> {
        let a = self.regs.read(rs1);
        let b = self.operand(op2);
        let icc = self.psr.icc();

        match op {
            AluOp::MulScc => {
                let step = muldiv::mulscc(self.y, a, b, icc);
                self.regs.write(rd, step.value);
                self.y = step.y;
                self.psr.set_icc(step.icc);
            }
            AluOp::UMul | AluOp::SMul => {
                let (hi, lo) = if op == AluOp::UMul {
                    muldiv::umul(a, b)
                } else {
                    muldiv::smul(a, b)
                };
                self.y = hi;
                self.regs.write(rd, lo);
                if cc {
                    self.psr.set_icc(logic::logic_icc(lo));
                }
            }
            AluOp::UDiv | AluOp::SDiv => {
                self.stall(DIVIDE_STALL_CYCLES);
                let quotient = if op == AluOp::UDiv {
                    muldiv::udiv(self.y, a, b)
                } else {
                    muldiv::sdiv(self.y, a, b)
                };
                let Some(q) = quotient else {
                    return self.trap(Exception::DivisionByZero);
                };
                self.regs.write(rd, q.value);
                if cc {
                    self.psr.set_icc(q.icc());
                }
            }
            AluOp::UMac | AluOp::SMac => {
                self.stall(SINGLE_STALL_CYCLES);
                let acc = self.asr[ASR_MAC_ACCUMULATOR];
                let mac = if op == AluOp::UMac {
                    muldiv::umac(self.y, acc, a, b)
                } else {
                    muldiv::smac(self.y, acc, a, b)
                };
                self.y = mac.y;
                self.asr[ASR_MAC_ACCUMULATOR] = mac.value;
                self.regs.write(rd, mac.value);
            }
            _ => {
                if let Some(out) = Alu::execute(op, a, b, icc.c) {
                    if op.traps_on_overflow() && out.icc.v {
                        return self.trap(Exception::TagOverflow);
                    }
                    self.regs.write(rd, out.value);
                    if cc {
                        self.psr.set_icc(out.icc);
                    }
                }
            }
        }
        Ok(Effect::Advance)
    }
}
