//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, the single execution context every
//! instruction operates on. It coordinates the following:
//! 1. **State Management:** Maintains the windowed register file, PSR, WIM, TBR, Y, ASRs and PC/NPC.
//! 2. **Platform Integration:** Owns the memory interface and the interrupt acknowledge output.
//! 3. **Interrupts:** Latches the pending external interrupt level driven by the platform.
//! 4. **Observability:** Collects statistics and records the last data access for watchpoints.

/// Control-transfer, window and trap instructions.
pub mod control;

/// Fetch, decode, dispatch and the integer operate instructions.
pub mod execution;

/// Load, store and atomic instructions.
pub mod memory;

/// Special register reads and writes.
pub mod special;

/// Exception dispatch and register-window rotation.
pub mod trap;

use crate::common::RegisterFile;
use crate::common::constants::{
    ASR_PROCESSOR_CONFIG, EXIT_CODE_REG, INSTRUCTION_SIZE, NUM_ASR, RESET_PSR, RESET_PSR_TSIM,
    RESET_WIM_TSIM,
};
use crate::common::data::DataAccess;
use crate::common::error::{Exception, SimError};
use crate::config::Config;
use crate::core::arch::psr::Psr;
use crate::core::timing::Timing;
use crate::isa::{Instruction, Operand};
use crate::soc::{IrqAck, Memory};
use crate::stats::SimStats;

/// Architectural outcome of one executed instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Sequential flow: `PC = NPC`, `NPC = NPC + 4`.
    Advance,
    /// Control transfer to the given PC/NPC pair.
    Transfer {
        /// New PC.
        pc: u32,
        /// New NPC.
        npc: u32,
    },
    /// The instruction raised an exception; PC/NPC were already vectored (or left alone if
    /// the exception was ignored).
    Trapped(Exception),
    /// The program requested termination with an exit code.
    Halt(u32),
}

/// Summary of a completed `Cpu::step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// Address of the executed instruction.
    pub pc: u32,
    /// The executed instruction; `None` if the fetch itself faulted.
    pub instruction: Option<Instruction>,
    /// Cycles charged by the timing model.
    pub cycles: u64,
    /// Exception raised by the instruction, if any.
    pub trap: Option<Exception>,
}

/// Main CPU structure containing all processor state.
pub struct Cpu {
    /// Windowed integer register file.
    pub regs: RegisterFile,
    /// Processor State Register.
    pub psr: Psr,
    /// Window Invalid Mask.
    pub wim: u32,
    /// Trap Base Register (TBA and TT).
    pub tbr: u32,
    /// Multiply/divide register.
    pub y: u32,
    /// Program Counter.
    pub pc: u32,
    /// Next Program Counter.
    pub npc: u32,
    /// Ancillary state registers; index 0 is unused (`%y`).
    pub asr: [u32; NUM_ASR],

    /// Memory interface used by fetch, loads and stores.
    pub memory: Box<dyn Memory>,
    /// Interrupt acknowledge output.
    pub irq_ack: Box<dyn IrqAck>,
    /// Pending external interrupt level (1-15).
    pub pending_irq: Option<u8>,

    /// Enable per-instruction tracing.
    pub trace: bool,
    /// Halt on an always-true Ticc instead of trapping.
    pub stop_on_ta: bool,
    /// Exit code if the program finished.
    pub exit_code: Option<u32>,
    /// Performance statistics.
    pub stats: SimStats,
    /// Data access performed by the last step, if any.
    pub last_data_access: Option<DataAccess>,

    /// Extra cycles reported by the instruction being executed.
    pub stall_cycles: u32,
    /// Cycle accounting strategy.
    pub timing: Timing,
    /// Instruction currently executing, for diagnostics.
    current: Option<Instruction>,
    processor_id: u32,
    tsim_compat: bool,
    tbr_base: u32,
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("pc", &format_args!("{:#010x}", self.pc))
            .field("npc", &format_args!("{:#010x}", self.npc))
            .field("psr", &format_args!("{:#010x}", self.psr.0))
            .field("wim", &format_args!("{:#x}", self.wim))
            .field("tbr", &format_args!("{:#010x}", self.tbr))
            .field("y", &format_args!("{:#x}", self.y))
            .finish_non_exhaustive()
    }
}

impl Cpu {
    /// Creates a new CPU in its reset state.
    ///
    /// # Arguments
    ///
    /// * `config` - The simulator configuration parameters.
    /// * `memory` - Memory interface for fetch and data accesses.
    /// * `irq_ack` - Sink driven when an external interrupt is taken.
    ///
    /// # Returns
    ///
    /// A new `Cpu` with PC at `config.general.start_pc`.
    ///
    /// # Errors
    ///
    /// `SimError::Config` if the configuration does not validate.
    pub fn new(
        config: &Config,
        memory: Box<dyn Memory>,
        irq_ack: Box<dyn IrqAck>,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let mut cpu = Self {
            regs: RegisterFile::new(config.cpu.num_windows),
            psr: Psr(RESET_PSR),
            wim: 0,
            tbr: 0,
            y: 0,
            pc: 0,
            npc: 0,
            asr: [0; NUM_ASR],
            memory,
            irq_ack,
            pending_irq: None,
            trace: config.general.trace_instructions,
            stop_on_ta: config.general.stop_on_ta,
            exit_code: None,
            stats: SimStats::default(),
            last_data_access: None,
            stall_cycles: 0,
            timing: Timing::new(config.general.execution_model),
            current: None,
            processor_id: config.cpu.processor_id,
            tsim_compat: config.cpu.tsim_compat,
            tbr_base: config.cpu.tbr_base,
        };
        cpu.reset(config.general.start_pc);
        Ok(cpu)
    }

    /// Restores the architectural reset state and starts execution at `entry`.
    ///
    /// Registers are cleared, PSR holds the LEON3 implementation/version with S set and
    /// ET clear (ET and PS also set in TSIM-compatible mode), and `%asr17` describes the
    /// processor index and window count.
    pub fn reset(&mut self, entry: u32) {
        self.regs.clear();
        if self.tsim_compat {
            self.psr = Psr(RESET_PSR_TSIM);
            self.wim = RESET_WIM_TSIM;
        } else {
            self.psr = Psr(RESET_PSR);
            self.wim = 0;
        }
        self.regs.bind_window(self.psr.cwp());
        self.tbr = self.tbr_base;
        self.y = 0;
        self.asr = [0; NUM_ASR];
        self.asr[ASR_PROCESSOR_CONFIG] =
            (self.processor_id << 28) | 0x300 | (self.num_windows() as u32 - 1);
        self.pc = entry;
        self.npc = entry.wrapping_add(INSTRUCTION_SIZE);
        self.pending_irq = None;
        self.exit_code = None;
        self.last_data_access = None;
        self.stall_cycles = 0;
        self.current = None;
    }

    /// Number of register windows.
    #[inline]
    pub fn num_windows(&self) -> usize {
        self.regs.num_windows()
    }

    /// Drives the interrupt request lines with `level` (1-15); 0 releases them.
    pub fn set_irq(&mut self, level: u8) {
        self.pending_irq = (1..=15).contains(&level).then_some(level);
    }

    /// Releases the interrupt request lines.
    pub const fn clear_irq(&mut self) {
        self.pending_irq = None;
    }

    /// Sets PC and NPC to `pc` and `pc + 4`.
    pub const fn jump_to(&mut self, pc: u32) {
        self.pc = pc;
        self.npc = pc.wrapping_add(INSTRUCTION_SIZE);
    }

    /// Retrieves the exit code if the program has finished.
    pub const fn take_exit(&mut self) -> Option<u32> {
        self.exit_code.take()
    }

    /// Returns `true` once the program has requested termination.
    pub const fn is_halted(&self) -> bool {
        self.exit_code.is_some()
    }

    /// Value the program left in `%o0`, its conventional exit code.
    pub fn exit_register(&self) -> u32 {
        self.regs.read(EXIT_CODE_REG)
    }

    /// Resolves a second operand.
    #[inline]
    pub(crate) fn operand(&self, op2: Operand) -> u32 {
        match op2 {
            Operand::Reg(r) => self.regs.read(r),
            Operand::Imm(v) => v,
        }
    }

    /// Computes `r[rs1] + op2`.
    #[inline]
    pub(crate) fn effective_address(&self, rs1: usize, op2: Operand) -> u32 {
        self.regs.read(rs1).wrapping_add(self.operand(op2))
    }

    /// Adds `cycles` to the stall report of the executing instruction.
    #[inline]
    pub(crate) const fn stall(&mut self, cycles: u32) {
        self.stall_cycles += cycles;
    }

    /// Dumps PC, special registers and the current window to stdout.
    pub fn dump_state(&self) {
        println!(
            "PC = {:#010x}  NPC = {:#010x}  PSR = {:#010x}  WIM = {:#010x}  TBR = {:#010x}  Y = {:#010x}",
            self.pc, self.npc, self.psr.0, self.wim, self.tbr, self.y
        );
        self.regs.dump();
    }
}
