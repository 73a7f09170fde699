

/// External interrupt injection.
pub mod interrupts;


/// Multiply, divide and multiply-accumulate.
pub mod muldiv;

/// Special register access and reset state.
pub mod special;


/// Trap entry, RETT and error mode.
pub mod traps;
