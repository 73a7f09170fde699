//! Common utilities and types used throughout the LEON3 simulator.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the simulator. It includes:
//! 1. **Constants:** Register window geometry, stall counts and reset values.
//! 2. **Memory Access:** Address space identifiers and access classification.
//! 3. **Error Handling:** Exception identifiers, memory errors and fatal simulation errors.
//! 4. **Register Management:** The windowed integer register file.

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Exception identifiers and error types.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use data::{AccessType, Asi, DataAccess};
pub use error::{Exception, MemoryError, SimError};
pub use reg::RegisterFile;
