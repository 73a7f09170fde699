//! Mock implementations of the processor's platform interfaces.

/// Interrupt acknowledge mock.
pub mod irq;


/// In-memory byte streams standing in for the GDB socket.
pub mod stream;
