//! SPARC Windowed Integer Register File.
//!
//! This module implements the integer register file of a SPARC V8 processor.
//! It performs the following:
//! 1. **Storage:** Maintains 8 global registers and a circular bank of `16 * NWINDOWS` windowed registers.
//! 2. **Aliasing:** Maps logical registers `r8`-`r31` onto the bank through the current window pointer,
//!    so that the outs of one window are the ins of the next.
//! 3. **Invariant Enforcement:** Ensures that register `g0` is hardwired to zero.
//! 4. **Debugging:** Provides utilities for dumping the visible register state.

use crate::common::constants::{NUM_GLOBALS, NUM_LOGICAL_REGS, WINDOW_SIZE};

/// Windowed general-purpose register file.
///
/// Logical register `r` in `8..32` of window `cwp` lives at physical index
/// `(cwp * 16 + r - 8) mod (16 * NWINDOWS)`. Consecutive windows therefore overlap by
/// eight registers: the outs (`r8`-`r15`) of window `w` are the ins (`r24`-`r31`) of
/// window `w - 1`.
#[derive(Clone, Debug)]
pub struct Gpr {
    globals: [u32; NUM_GLOBALS],
    windows: Vec<u32>,
    num_windows: usize,
    cwp: usize,
}

impl Gpr {
    /// Creates a register file with `num_windows` windows, all registers zero and CWP 0.
    ///
    /// # Arguments
    ///
    /// * `num_windows` - Number of register windows; callers validate the range.
    ///
    /// # Returns
    ///
    /// A new `Gpr` instance bound to window 0.
    pub fn new(num_windows: usize) -> Self {
        Self {
            globals: [0; NUM_GLOBALS],
            windows: vec![0; WINDOW_SIZE * num_windows],
            num_windows,
            cwp: 0,
        }
    }

    /// Returns the number of register windows.
    #[inline]
    pub const fn num_windows(&self) -> usize {
        self.num_windows
    }

    /// Returns the window the logical registers are currently bound to.
    #[inline]
    pub const fn cwp(&self) -> usize {
        self.cwp
    }

    /// Rebinds the logical registers `r8`-`r31` to window `cwp`.
    ///
    /// The window index is reduced modulo the window count.
    pub fn bind_window(&mut self, cwp: usize) {
        self.cwp = cwp % self.num_windows;
    }

    #[inline(always)]
    fn physical(&self, window: usize, idx: usize) -> usize {
        (window * WINDOW_SIZE + idx - NUM_GLOBALS) % self.windows.len()
    }

    /// Reads a logical register in the current window.
    ///
    /// # Arguments
    ///
    /// * `idx` - Logical register index (0-31). Register `g0` always returns 0.
    ///
    /// # Returns
    ///
    /// The 32-bit value stored in the register.
    #[inline(always)]
    pub fn read(&self, idx: usize) -> u32 {
        self.read_in(self.cwp, idx)
    }

    /// Writes a logical register in the current window.
    ///
    /// # Arguments
    ///
    /// * `idx` - Logical register index (0-31). Writes to `g0` are ignored.
    /// * `val` - The 32-bit value to write.
    #[inline(always)]
    pub fn write(&mut self, idx: usize, val: u32) {
        self.write_in(self.cwp, idx, val);
    }

    /// Reads a logical register as seen from an arbitrary window.
    pub fn read_in(&self, window: usize, idx: usize) -> u32 {
        match idx {
            0 => 0,
            1..NUM_GLOBALS => self.globals[idx],
            NUM_GLOBALS..NUM_LOGICAL_REGS => self.windows[self.physical(window, idx)],
            _ => 0,
        }
    }

    /// Writes a logical register as seen from an arbitrary window.
    pub fn write_in(&mut self, window: usize, idx: usize, val: u32) {
        match idx {
            1..NUM_GLOBALS => self.globals[idx] = val,
            NUM_GLOBALS..NUM_LOGICAL_REGS => {
                let p = self.physical(window, idx);
                self.windows[p] = val;
            }
            _ => {}
        }
    }

    /// Zeroes every global and windowed register. CWP is left unchanged.
    pub fn clear(&mut self) {
        self.globals = [0; NUM_GLOBALS];
        self.windows.fill(0);
    }

    /// Dumps the 32 visible registers to stdout.
    pub fn dump(&self) {
        const BANKS: [char; 4] = ['g', 'o', 'l', 'i'];
        for i in (0..NUM_LOGICAL_REGS).step_by(2) {
            println!(
                "%{}{}={:#010x} %{}{}={:#010x}",
                BANKS[i / 8],
                i % 8,
                self.read(i),
                BANKS[(i + 1) / 8],
                (i + 1) % 8,
                self.read(i + 1)
            );
        }
    }
}
