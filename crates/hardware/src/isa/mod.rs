//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the SPARC V8 integer instruction set as implemented by LEON3:
//! opcode tables, field extraction, decoding into the `Instruction` sum type,
//! and disassembly.
//!
//! # Coverage
//!
//! * Arithmetic, logic, shift and tagged arithmetic.
//! * Multiply, multiply-step, divide and the LEON3 multiply-accumulate pair.
//! * Loads and stores, including alternate-space and atomic forms.
//! * Branches, CALL, JMPL, RETT, Ticc, SAVE and RESTORE.
//! * Special register access (Y, PSR, WIM, TBR, ASRs), STBAR, FLUSH and UNIMP.

/// Instruction decoding into the `Instruction` sum type.
pub mod decode;

/// Instruction disassembler for debug tracing and diagnostics.
pub mod disasm;

/// Bit-field extraction and sign extension.
pub mod instruction;

/// Opcode, condition and common-pattern tables.
pub mod opcodes;

pub use decode::{Cond, Instruction, Operand, decode};
