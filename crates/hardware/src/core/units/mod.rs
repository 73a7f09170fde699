//! Execution units and functional components.
//!
//! This module contains the integer unit's arithmetic logic unit. Loads,
//! stores, and control transfers are executed directly by the CPU context.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;
