//! SPARC V8 architecture-specific components.
//!
//! This module contains the implementation of core SPARC architectural elements.
//! It includes the following modules:
//! 1. **GPRs:** The windowed integer register file.
//! 2. **PSR:** Processor State Register fields and integer condition codes.
//! 3. **Traps:** Trap table types, TBR layout, and interrupt masking.

/// Windowed general-purpose register file implementation.
pub mod gpr;

/// Processor State Register definitions.
pub mod psr;

/// Trap table and trap base register utilities.
pub mod trap;
