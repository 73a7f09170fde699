//! Global System Constants.
//!
//! This module defines processor-wide constants used across the simulator. It includes:
//! 1. **Register Window Constants:** Window counts and bank sizes.
//! 2. **Instruction Constants:** Instruction size and PC advance.
//! 3. **Timing Constants:** Fixed stall counts reported by multi-cycle instructions.
//! 4. **Reset Constants:** Power-on values of the special registers.

/// Size of a SPARC instruction in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Number of window-independent global registers (`g0`-`g7`).
pub const NUM_GLOBALS: usize = 8;

/// Number of physical registers owned by each window (8 locals + 8 ins).
pub const WINDOW_SIZE: usize = 16;

/// Number of logical integer registers visible at any time.
pub const NUM_LOGICAL_REGS: usize = 32;

/// Default number of register windows on LEON3.
pub const DEFAULT_NUM_WINDOWS: usize = 8;

/// Smallest legal register-window count.
pub const MIN_WINDOWS: usize = 2;

/// Largest legal register-window count (CWP is a 5-bit field).
pub const MAX_WINDOWS: usize = 32;

/// Number of ancillary state registers.
pub const NUM_ASR: usize = 32;

/// ASR holding the processor configuration (`%asr17`).
pub const ASR_PROCESSOR_CONFIG: usize = 17;

/// ASR holding the low word of the multiply-accumulate accumulator (`%asr18`).
pub const ASR_MAC_ACCUMULATOR: usize = 18;

/// Logical register written by CALL with the return address (`%o7`).
pub const CALL_LINK_REG: usize = 15;

/// Logical register receiving the trapped PC on trap entry (`%l1`).
pub const TRAP_PC_REG: usize = 17;

/// Logical register receiving the trapped NPC on trap entry (`%l2`).
pub const TRAP_NPC_REG: usize = 18;

/// Logical register holding the first outgoing argument and exit code (`%o0`).
pub const EXIT_CODE_REG: usize = 8;

/// Base cycle count reported by every Bicc instruction.
pub const BRANCH_BASE_CYCLES: u32 = 2;

/// Stall cycles of every divide instruction, including divide-by-zero.
pub const DIVIDE_STALL_CYCLES: u32 = 34;

/// Stall cycles of a taken Ticc instruction.
pub const TRAP_INSTRUCTION_STALL_CYCLES: u32 = 4;

/// Stall cycles of JMPL and RETT.
pub const JUMP_STALL_CYCLES: u32 = 2;

/// Stall cycles of atomic load-store instructions (LDSTUB, SWAP).
pub const ATOMIC_STALL_CYCLES: u32 = 2;

/// Stall cycles of STD.
pub const STORE_DOUBLE_STALL_CYCLES: u32 = 2;

/// Stall cycles of byte, halfword and word stores, LDD and UMAC/SMAC.
pub const SINGLE_STALL_CYCLES: u32 = 1;

/// Power-on PSR value: implementation/version 0xF3, supervisor, traps disabled, CWP 0.
pub const RESET_PSR: u32 = 0xF300_0080;

/// Power-on PSR value in TSIM compatibility mode: supervisor, previous supervisor, traps enabled.
pub const RESET_PSR_TSIM: u32 = 0xF300_00E0;

/// Power-on WIM value in TSIM compatibility mode.
pub const RESET_WIM_TSIM: u32 = 2;

/// Address the PC is vectored to on a RESET exception.
pub const RESET_VECTOR: u32 = 0;
