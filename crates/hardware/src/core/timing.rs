//! Execution timing strategies.
//!
//! Every instruction reports how many extra cycles it occupies the integer unit
//! (divide 34, taken Ticc 4, branch 2, ...). The timing strategy turns that report
//! into the number of cycles the step advances the simulated clock by:
//! 1. **Functional:** One cycle per instruction; stall reports are ignored.
//! 2. **Timed:** One cycle plus the reported stall cycles.

use crate::config::ExecutionModel;

/// Converts an instruction's stall report into elapsed cycles.
pub trait TimingModel {
    /// Returns the cycles consumed by an instruction that reported `stall` extra cycles.
    fn instruction_cycles(&self, stall: u32) -> u64;

    /// Short human-readable name.
    fn name(&self) -> &'static str;
}

/// One cycle per instruction.
#[derive(Clone, Copy, Debug, Default)]
pub struct FunctionalTiming;

impl TimingModel for FunctionalTiming {
    #[inline]
    fn instruction_cycles(&self, _stall: u32) -> u64 {
        1
    }

    fn name(&self) -> &'static str {
        "functional"
    }
}

/// One cycle plus the reported stall cycles.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimedTiming;

impl TimingModel for TimedTiming {
    #[inline]
    fn instruction_cycles(&self, stall: u32) -> u64 {
        1 + u64::from(stall)
    }

    fn name(&self) -> &'static str {
        "timed"
    }
}

/// Enum wrapper for static dispatch of timing strategies.
#[derive(Clone, Copy, Debug)]
pub enum Timing {
    /// See [`FunctionalTiming`].
    Functional(FunctionalTiming),
    /// See [`TimedTiming`].
    Timed(TimedTiming),
}

impl Timing {
    /// Creates the strategy selected by `model`.
    pub const fn new(model: ExecutionModel) -> Self {
        match model {
            ExecutionModel::Functional => Self::Functional(FunctionalTiming),
            ExecutionModel::Timed => Self::Timed(TimedTiming),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(ExecutionModel::default())
    }
}

impl TimingModel for Timing {
    #[inline]
    fn instruction_cycles(&self, stall: u32) -> u64 {
        match self {
            Self::Functional(t) => t.instruction_cycles(stall),
            Self::Timed(t) => t.instruction_cycles(stall),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Functional(t) => t.name(),
            Self::Timed(t) => t.name(),
        }
    }
}
