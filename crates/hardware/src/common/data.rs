//! Memory Access Types.
//!
//! This module defines the classification of memory accesses used throughout the simulator.
//! These types are used for the following:
//! 1. **Address Space Selection:** Address Space Identifiers (ASIs) attached to every access.
//! 2. **Fault Generation:** Determining whether a failed access raises an instruction or data error.
//! 3. **Debug Support:** Recording the last data access of a step for watchpoint matching.

use std::fmt;

/// Type of memory access operation.
///
/// Used to distinguish between instruction fetches, data loads, and data stores
/// so that access faults are mapped to the correct SPARC exception.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Instruction fetch access.
    ///
    /// A failure raises `INSTR_ACCESS_ERROR`.
    Fetch,

    /// Data read access.
    ///
    /// Occurs during load instructions and the read half of atomic instructions.
    Read,

    /// Data write access.
    ///
    /// Occurs during store instructions and the write half of atomic instructions.
    Write,
}

/// SPARC Address Space Identifier.
///
/// Every memory access carries an 8-bit ASI. Ordinary loads and stores derive it from
/// the supervisor bit; the alternate-space forms take it from the instruction word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Asi(pub u8);

impl Asi {
    /// User instruction space.
    pub const USER_INSTRUCTION: Self = Self(0x08);
    /// Supervisor instruction space.
    pub const SUPERVISOR_INSTRUCTION: Self = Self(0x09);
    /// User data space.
    pub const USER_DATA: Self = Self(0x0A);
    /// Supervisor data space.
    pub const SUPERVISOR_DATA: Self = Self(0x0B);

    /// Returns the ASI used by an ordinary data access in the given mode.
    #[inline]
    pub const fn data(supervisor: bool) -> Self {
        if supervisor {
            Self::SUPERVISOR_DATA
        } else {
            Self::USER_DATA
        }
    }

    /// Returns the ASI used by an instruction fetch in the given mode.
    #[inline]
    pub const fn instruction(supervisor: bool) -> Self {
        if supervisor {
            Self::SUPERVISOR_INSTRUCTION
        } else {
            Self::USER_INSTRUCTION
        }
    }
}

impl fmt::Display for Asi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// A data memory access performed by an instruction.
///
/// The CPU records the most recent access of each step so that the debugger can
/// match it against watchpoints without hooking the memory interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataAccess {
    /// Starting address of the access.
    pub addr: u32,
    /// Access width in bytes.
    pub size: u32,
    /// Whether the access read or wrote memory.
    pub kind: AccessType,
}
