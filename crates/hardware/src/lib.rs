//! SPARC V8 (LEON3) processor simulator library.
//!
//! This crate implements an instruction-accurate LEON3 integer unit with the following:
//! 1. **Core:** Windowed register file, PSR/WIM/TBR/Y/ASR state, the trap dispatcher and
//!    external interrupt injection, under a functional or approximately timed cycle model.
//! 2. **ISA:** Decoding, execution and disassembly of the SPARC V8 integer instruction set,
//!    including the LEON3 multiply-accumulate extension.
//! 3. **Debug:** A GDB Remote Serial Protocol stub driving the simulator over TCP.
//! 4. **SoC:** The memory and interrupt-acknowledge interfaces, and a RAM implementation.
//! 5. **Simulation:** Image loading, session bookkeeping, configuration and statistics.

/// Common types and constants (access types, register file, exceptions, errors).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// CPU core (architectural state, execution, traps, timing).
pub mod core;
/// GDB remote debugging (packets, connection, stub).
pub mod debug;
/// Instruction set (decode, instruction, opcodes, disassembly).
pub mod isa;
/// Image loader, session and the simulator run loop.
pub mod sim;
/// Memory and interrupt interfaces and their implementations.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main CPU type; holds the architectural state, memory and stats.
pub use crate::core::Cpu;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
