//! Exception and Error definitions.
//!
//! This module defines the error handling and trap mechanisms for the simulator. It provides:
//! 1. **Exception Representation:** The enumerated SPARC trap causes raised by instructions and interrupts.
//! 2. **Memory Errors:** Failures reported by the memory interface instead of thrown exceptions.
//! 3. **Fatal Errors:** Host-level conditions that terminate a simulation run.
//!
//! Architectural exceptions are plain values routed through the trap dispatcher; they are never
//! `SimError`s. Only conditions the simulated program cannot recover from are errors.

use std::fmt;

use thiserror::Error;

use super::data::Asi;
use crate::config::ConfigError;

/// SPARC exception identifiers.
///
/// The discriminant is the exception id consumed by the trap dispatcher. Ids below
/// [`Exception::InterruptLevel15`] are precise traps; ids between
/// [`Exception::TrapInstruction`] and [`Exception::ImplDependent`] are external interrupts,
/// with interrupt level `38 - id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Exception {
    /// Processor reset.
    Reset = 0,
    /// Deferred data store error.
    DataStoreError = 1,
    /// Instruction access MMU miss.
    InstrAccessMmuMiss = 2,
    /// Instruction access error (bus error on fetch).
    InstrAccessError = 3,
    /// Register file access error.
    RRegisterAccessError = 4,
    /// Instruction access exception.
    InstrAccessException = 5,
    /// Privileged instruction executed in user mode.
    PrivilegedInstruction = 6,
    /// Illegal instruction.
    IllegalInstruction = 7,
    /// Floating-point unit disabled.
    FpDisabled = 8,
    /// Coprocessor disabled.
    CpDisabled = 9,
    /// Unimplemented FLUSH.
    UnimplementedFlush = 10,
    /// Watchpoint detected.
    WatchpointDetected = 11,
    /// Register window overflow (SAVE into an invalid window).
    WindowOverflow = 12,
    /// Register window underflow (RESTORE into an invalid window).
    WindowUnderflow = 13,
    /// Memory address not aligned.
    MemAddrNotAligned = 14,
    /// Floating-point exception.
    FpException = 15,
    /// Coprocessor exception.
    CpException = 16,
    /// Data access error (bus error on load or store).
    DataAccessError = 17,
    /// Data access MMU miss.
    DataAccessMmuMiss = 18,
    /// Data access exception.
    DataAccessException = 19,
    /// Tagged arithmetic overflow.
    TagOverflow = 20,
    /// Integer division by zero.
    DivisionByZero = 21,
    /// Software trap raised by Ticc.
    TrapInstruction = 22,
    /// External interrupt, level 15 (non-maskable).
    InterruptLevel15 = 23,
    /// External interrupt, level 14.
    InterruptLevel14 = 24,
    /// External interrupt, level 13.
    InterruptLevel13 = 25,
    /// External interrupt, level 12.
    InterruptLevel12 = 26,
    /// External interrupt, level 11.
    InterruptLevel11 = 27,
    /// External interrupt, level 10.
    InterruptLevel10 = 28,
    /// External interrupt, level 9.
    InterruptLevel9 = 29,
    /// External interrupt, level 8.
    InterruptLevel8 = 30,
    /// External interrupt, level 7.
    InterruptLevel7 = 31,
    /// External interrupt, level 6.
    InterruptLevel6 = 32,
    /// External interrupt, level 5.
    InterruptLevel5 = 33,
    /// External interrupt, level 4.
    InterruptLevel4 = 34,
    /// External interrupt, level 3.
    InterruptLevel3 = 35,
    /// External interrupt, level 2.
    InterruptLevel2 = 36,
    /// External interrupt, level 1.
    InterruptLevel1 = 37,
    /// Implementation-dependent exception.
    ImplDependent = 38,
}

impl Exception {
    /// All exceptions, indexed by id.
    pub const ALL: [Self; 39] = [
        Self::Reset,
        Self::DataStoreError,
        Self::InstrAccessMmuMiss,
        Self::InstrAccessError,
        Self::RRegisterAccessError,
        Self::InstrAccessException,
        Self::PrivilegedInstruction,
        Self::IllegalInstruction,
        Self::FpDisabled,
        Self::CpDisabled,
        Self::UnimplementedFlush,
        Self::WatchpointDetected,
        Self::WindowOverflow,
        Self::WindowUnderflow,
        Self::MemAddrNotAligned,
        Self::FpException,
        Self::CpException,
        Self::DataAccessError,
        Self::DataAccessMmuMiss,
        Self::DataAccessException,
        Self::TagOverflow,
        Self::DivisionByZero,
        Self::TrapInstruction,
        Self::InterruptLevel15,
        Self::InterruptLevel14,
        Self::InterruptLevel13,
        Self::InterruptLevel12,
        Self::InterruptLevel11,
        Self::InterruptLevel10,
        Self::InterruptLevel9,
        Self::InterruptLevel8,
        Self::InterruptLevel7,
        Self::InterruptLevel6,
        Self::InterruptLevel5,
        Self::InterruptLevel4,
        Self::InterruptLevel3,
        Self::InterruptLevel2,
        Self::InterruptLevel1,
        Self::ImplDependent,
    ];

    /// Returns the numeric exception id.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Looks up an exception by numeric id.
    ///
    /// # Arguments
    ///
    /// * `id` - Exception id in `0..=38`.
    ///
    /// # Returns
    ///
    /// The matching exception, or `None` for an out-of-range id.
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Returns the exception raised for an external interrupt of the given level.
    ///
    /// Level 1 maps to id 37 and level 15 to id 23.
    pub fn interrupt(level: u8) -> Option<Self> {
        if (1..=15).contains(&level) {
            Self::from_id(Self::ImplDependent.id() - level)
        } else {
            None
        }
    }

    /// Returns `true` for the external interrupt ids.
    #[inline]
    pub const fn is_interrupt(self) -> bool {
        let id = self.id();
        id > Self::TrapInstruction.id() && id < Self::ImplDependent.id()
    }

    /// Returns `true` for exceptions that put the processor into error mode when
    /// raised with traps disabled.
    #[inline]
    pub const fn is_precise(self) -> bool {
        self.id() < Self::InterruptLevel15.id()
    }

    /// Returns the interrupt level acknowledged for an external interrupt.
    #[inline]
    pub const fn interrupt_level(self) -> Option<u8> {
        if self.is_interrupt() {
            Some(Self::ImplDependent.id() - self.id())
        } else {
            None
        }
    }

    /// Returns the upper-case architectural name of the exception.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reset => "RESET",
            Self::DataStoreError => "DATA_STORE_ERROR",
            Self::InstrAccessMmuMiss => "INSTR_ACCESS_MMU_MISS",
            Self::InstrAccessError => "INSTR_ACCESS_ERROR",
            Self::RRegisterAccessError => "R_REGISTER_ACCESS_ERROR",
            Self::InstrAccessException => "INSTR_ACCESS_EXC",
            Self::PrivilegedInstruction => "PRIVILEDGE_INSTR",
            Self::IllegalInstruction => "ILLEGAL_INSTR",
            Self::FpDisabled => "FP_DISABLED",
            Self::CpDisabled => "CP_DISABLED",
            Self::UnimplementedFlush => "UNIMPL_FLUSH",
            Self::WatchpointDetected => "WATCHPOINT_DETECTED",
            Self::WindowOverflow => "WINDOW_OVERFLOW",
            Self::WindowUnderflow => "WINDOW_UNDERFLOW",
            Self::MemAddrNotAligned => "MEM_ADDR_NOT_ALIGNED",
            Self::FpException => "FP_EXCEPTION",
            Self::CpException => "CP_EXCEPTION",
            Self::DataAccessError => "DATA_ACCESS_ERROR",
            Self::DataAccessMmuMiss => "DATA_ACCESS_MMU_MISS",
            Self::DataAccessException => "DATA_ACCESS_EXC",
            Self::TagOverflow => "TAG_OVERFLOW",
            Self::DivisionByZero => "DIV_ZERO",
            Self::TrapInstruction => "TRAP_INSTRUCTION",
            Self::InterruptLevel15 => "IRQ_LEV_15",
            Self::InterruptLevel14 => "IRQ_LEV_14",
            Self::InterruptLevel13 => "IRQ_LEV_13",
            Self::InterruptLevel12 => "IRQ_LEV_12",
            Self::InterruptLevel11 => "IRQ_LEV_11",
            Self::InterruptLevel10 => "IRQ_LEV_10",
            Self::InterruptLevel9 => "IRQ_LEV_9",
            Self::InterruptLevel8 => "IRQ_LEV_8",
            Self::InterruptLevel7 => "IRQ_LEV_7",
            Self::InterruptLevel6 => "IRQ_LEV_6",
            Self::InterruptLevel5 => "IRQ_LEV_5",
            Self::InterruptLevel4 => "IRQ_LEV_4",
            Self::InterruptLevel3 => "IRQ_LEV_3",
            Self::InterruptLevel2 => "IRQ_LEV_2",
            Self::InterruptLevel1 => "IRQ_LEV_1",
            Self::ImplDependent => "IMPL_DEP_EXC",
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure reported by the memory interface.
///
/// Memory models return these instead of unwinding; the CPU converts them into
/// `DATA_ACCESS_ERROR` or `INSTR_ACCESS_ERROR` traps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// No device or RAM is mapped at the address.
    #[error("no memory mapped at {addr:#010x} (asi {asi})")]
    Unmapped {
        /// Faulting address.
        addr: u32,
        /// Address space of the access.
        asi: Asi,
    },

    /// The access runs past the end of the mapped region.
    #[error("access of {size} bytes at {addr:#010x} crosses the end of memory")]
    OutOfRange {
        /// Starting address of the access.
        addr: u32,
        /// Access width in bytes.
        size: u32,
    },

    /// The region rejects writes.
    #[error("write to read-only memory at {addr:#010x}")]
    ReadOnly {
        /// Faulting address.
        addr: u32,
    },
}

/// Fatal simulation errors.
///
/// Every variant terminates the run and unwinds to the top-level driver, which reports
/// it. The simulated program never observes these.
#[derive(Debug, Error)]
pub enum SimError {
    /// A precise trap was raised while traps were disabled (SPARC error mode).
    #[error("{exception} raised with traps disabled at pc {pc:#010x} ({mnemonic}): processor enters error mode")]
    ErrorMode {
        /// The exception that could not be taken.
        exception: Exception,
        /// Address of the offending instruction.
        pc: u32,
        /// Disassembly of the offending instruction.
        mnemonic: String,
    },

    /// RETT found an inconsistent processor state with traps disabled.
    #[error(
        "invalid processor mode during RETT at pc {pc:#010x}: supervisor {supervisor}, new cwp {new_cwp:#x}, target {target:#010x}"
    )]
    RettInvariant {
        /// Address of the RETT instruction.
        pc: u32,
        /// Supervisor bit at the time of the RETT.
        supervisor: bool,
        /// Window the RETT tried to restore.
        new_cwp: u32,
        /// Return target address.
        target: u32,
    },

    /// The fetched word does not decode to any implemented instruction.
    #[error("invalid instruction {word:#010x} at pc {pc:#010x}")]
    InvalidInstruction {
        /// The raw instruction word.
        word: u32,
        /// Address it was fetched from.
        pc: u32,
    },

    /// A platform-side memory access failed (image loading, debugger pokes).
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Host I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The executable image could not be parsed.
    #[error("cannot load image: {0}")]
    Image(String),
}
