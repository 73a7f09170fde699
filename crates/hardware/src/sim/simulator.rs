//! Simulator: owns the CPU, its memory and the session side-by-side.
//!
//! The simulator is the platform's fetch loop. It builds the RAM region and the CPU
//! from the configuration, loads program images, and runs instructions until the
//! program exits, the instruction limit is reached, or a fatal error stops it.

use std::path::Path;

use crate::common::error::SimError;
use crate::config::Config;
use crate::core::{Cpu, StepOutcome};
use crate::sim::loader::{self, LoadedImage};
use crate::sim::session::Session;
use crate::soc::{IrqAckLog, Memory, Ram};

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The program exited with the given code.
    Exited(u32),
    /// The configured instruction limit was reached.
    InstructionLimit,
    /// The debugger killed the program.
    Killed,
}

/// Top-level simulator: CPU architectural state + session.
pub struct Simulator {
    /// CPU architectural state (registers, memory, stats).
    pub cpu: Cpu,
    /// Running-program accounting.
    pub session: Session,
    /// Interrupt levels acknowledged by the CPU.
    pub irq_log: IrqAckLog,
    max_instructions: Option<u64>,
    progress_interval: u64,
    group: u32,
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("cpu", &self.cpu)
            .field("session", &self.session)
            .field("max_instructions", &self.max_instructions)
            .finish_non_exhaustive()
    }
}

impl Simulator {
    /// Creates a simulator with a RAM region as described by `config`.
    ///
    /// # Errors
    ///
    /// `SimError::Config` if the configuration does not validate.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        let ram = Ram::new(config.memory.ram_base, config.memory.ram_size);
        Self::with_memory(config, Box::new(ram))
    }

    /// Creates a simulator over an arbitrary memory implementation.
    ///
    /// # Errors
    ///
    /// `SimError::Config` if the configuration does not validate.
    pub fn with_memory(config: &Config, memory: Box<dyn Memory>) -> Result<Self, SimError> {
        let irq_log = IrqAckLog::new();
        let cpu = Cpu::new(config, memory, Box::new(irq_log.clone()))?;
        let mut session = Session::new();
        let group = config.cpu.processor_id;
        session.register_program(group);
        Ok(Self {
            cpu,
            session,
            irq_log,
            max_instructions: config.general.max_instructions,
            progress_interval: config.general.progress_interval,
            group,
        })
    }

    /// Loads an image and resets the CPU to its entry point.
    ///
    /// # Arguments
    ///
    /// * `path` - Raw binary or ELF image.
    /// * `load_addr` - Load address of a raw image.
    /// * `entry` - Overrides the entry point of the image.
    ///
    /// # Errors
    ///
    /// Propagates loader failures.
    pub fn load_image(
        &mut self,
        path: impl AsRef<Path>,
        load_addr: u32,
        entry: Option<u32>,
    ) -> Result<LoadedImage, SimError> {
        let image = loader::load_file(self.cpu.memory.as_mut(), path, load_addr)?;
        let start = entry.unwrap_or(image.entry);
        self.restart(start);
        tracing::info!(
            entry = format_args!("{start:#010x}"),
            segments = image.segments.len(),
            bytes = image.footprint(),
            "image loaded"
        );
        Ok(image)
    }

    /// Executes one instruction.
    ///
    /// The session records an exit on the step that halts the program; stepping an
    /// already halted program records nothing.
    ///
    /// # Errors
    ///
    /// Fatal simulation errors from the CPU.
    pub fn step(&mut self) -> Result<StepOutcome, SimError> {
        let running = self.cpu.exit_code.is_none();
        let outcome = self.cpu.step()?;
        if running
            && let Some(code) = self.cpu.exit_code
            && self.session.program_exited(code)
        {
            tracing::info!(code, "all programs exited");
        }
        let retired = self.cpu.stats.instructions_retired;
        if self.progress_interval != 0 && retired % self.progress_interval == 0 {
            tracing::info!(
                instructions = retired,
                cycles = self.cpu.stats.cycles,
                pc = format_args!("{:#010x}", self.cpu.pc),
                "progress"
            );
        }
        Ok(outcome)
    }

    /// Runs until every program of the session has exited or the instruction limit is
    /// reached.
    ///
    /// # Errors
    ///
    /// Fatal simulation errors from the CPU.
    pub fn run(&mut self) -> Result<RunOutcome, SimError> {
        loop {
            if self.session.is_finished() {
                let code = self.session.exit_codes().last().copied().unwrap_or_default();
                return Ok(RunOutcome::Exited(code));
            }
            if self.limit_reached() {
                tracing::info!(
                    limit = self.max_instructions,
                    "instruction limit reached"
                );
                return Ok(RunOutcome::InstructionLimit);
            }
            self.step()?;
        }
    }

    /// Returns `true` once the configured instruction limit has been retired.
    pub fn limit_reached(&self) -> bool {
        self.max_instructions
            .is_some_and(|max| self.cpu.stats.instructions_retired >= max)
    }

    /// Exit code of the program, once it has exited.
    pub const fn exit_code(&self) -> Option<u32> {
        self.cpu.exit_code
    }

    /// Restarts the program at `entry` and re-registers it with the session.
    pub fn restart(&mut self, entry: u32) {
        self.cpu.reset(entry);
        self.session.reset();
        self.session.register_program(self.group);
    }
}
