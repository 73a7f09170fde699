//! Core processor implementation.
//!
//! This module contains the integer unit: architectural state definitions, the
//! execution context and its instruction routines, the integer ALU, and the
//! timing strategies that charge cycles for each executed instruction.

/// Architecture-specific components (register windows, PSR, trap table).
pub mod arch;

/// CPU core implementation and execution orchestration.
pub mod cpu;

/// Functional and timed cycle accounting.
pub mod timing;

/// Execution units (integer ALU, multiply/divide).
pub mod units;

pub use self::cpu::{Cpu, Effect, StepOutcome};
