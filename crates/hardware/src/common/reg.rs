//! Integer Register File.
//!
//! This module provides the `RegisterFile` struct, the interface the execution context uses
//! to reach the windowed integer registers. It provides:
//! 1. **Logical Access:** Reads and writes by logical index through the current window.
//! 2. **Window Control:** Rebinding of the logical registers when CWP changes.
//! 3. **Naming:** SPARC assembler names (`%g0`-`%i7`) for disassembly and dumps.

use crate::core::arch::gpr::Gpr;

/// Assembler names of the 32 logical integer registers.
pub const REGISTER_NAMES: [&str; 32] = [
    "%g0", "%g1", "%g2", "%g3", "%g4", "%g5", "%g6", "%g7", "%o0", "%o1", "%o2", "%o3", "%o4",
    "%o5", "%sp", "%o7", "%l0", "%l1", "%l2", "%l3", "%l4", "%l5", "%l6", "%l7", "%i0", "%i1",
    "%i2", "%i3", "%i4", "%i5", "%fp", "%i7",
];

/// Windowed integer register file.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    gpr: Gpr,
}

impl RegisterFile {
    /// Creates a register file with `num_windows` windows, bound to window 0.
    ///
    /// # Arguments
    ///
    /// * `num_windows` - Number of register windows.
    ///
    /// # Returns
    ///
    /// A new zeroed `RegisterFile`.
    pub fn new(num_windows: usize) -> Self {
        Self {
            gpr: Gpr::new(num_windows),
        }
    }

    /// Reads a logical register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Register `%g0` always returns 0.
    ///
    /// # Returns
    ///
    /// The 32-bit value of the register in the current window.
    #[inline(always)]
    pub fn read(&self, idx: usize) -> u32 {
        self.gpr.read(idx)
    }

    /// Writes a logical register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Writes to `%g0` are ignored.
    /// * `val` - The 32-bit value to write.
    #[inline(always)]
    pub fn write(&mut self, idx: usize, val: u32) {
        self.gpr.write(idx, val);
    }

    /// Rebinds `r8`-`r31` to the given window.
    pub fn bind_window(&mut self, cwp: usize) {
        self.gpr.bind_window(cwp);
    }

    /// Returns the currently bound window.
    pub const fn cwp(&self) -> usize {
        self.gpr.cwp()
    }

    /// Returns the number of register windows.
    pub const fn num_windows(&self) -> usize {
        self.gpr.num_windows()
    }

    /// Reads a logical register as seen from another window.
    pub fn read_in(&self, window: usize, idx: usize) -> u32 {
        self.gpr.read_in(window, idx)
    }

    /// Zeroes the whole register bank.
    pub fn clear(&mut self) {
        self.gpr.clear();
    }

    /// Returns the assembler name of a logical register.
    pub fn name(idx: usize) -> &'static str {
        REGISTER_NAMES.get(idx).copied().unwrap_or("%??")
    }

    /// Dumps the visible registers to stdout.
    pub fn dump(&self) {
        self.gpr.dump();
    }
}
