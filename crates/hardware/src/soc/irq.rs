//! Interrupt acknowledge sinks.
//!
//! The processor drives its acknowledge output whenever it takes an external
//! interrupt. Platforms without an interrupt controller model plug in
//! `NullIrqAck`; the simulator uses `IrqAckLog` so that the driving code can
//! observe which levels were taken.

use std::sync::{Arc, Mutex};

use crate::soc::traits::IrqAck;

/// Acknowledge sink that only traces the level.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullIrqAck;

impl IrqAck for NullIrqAck {
    fn acknowledge(&mut self, level: u8) {
        tracing::debug!(level, "interrupt acknowledged");
    }
}

/// Acknowledge sink that records every acknowledged level.
///
/// Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct IrqAckLog {
    levels: Arc<Mutex<Vec<u8>>>,
}

impl IrqAckLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the acknowledged levels in order and clears the log.
    pub fn drain(&self) -> Vec<u8> {
        self.levels
            .lock()
            .map(|mut levels| std::mem::take(&mut *levels))
            .unwrap_or_default()
    }

    /// Returns the number of acknowledged levels not yet drained.
    pub fn len(&self) -> usize {
        self.levels.lock().map(|levels| levels.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing was acknowledged since the last drain.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IrqAck for IrqAckLog {
    fn acknowledge(&mut self, level: u8) {
        tracing::debug!(level, "interrupt acknowledged");
        if let Ok(mut levels) = self.levels.lock() {
            levels.push(level);
        }
    }
}
