//! System-on-Chip (SoC) Components.
//!
//! This module organizes the platform side of the processor: the memory
//! interface and its RAM implementation, and the interrupt acknowledge
//! output.

/// Interrupt acknowledge sinks.
pub mod irq;

/// RAM implementation of the memory interface.
pub mod memory;

/// Memory and interrupt-acknowledge trait definitions.
pub mod traits;

pub use irq::{IrqAckLog, NullIrqAck};
pub use memory::Ram;
pub use traits::{IrqAck, Memory};
