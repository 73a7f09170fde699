//! Simulation driver and program loading.
//!
//! Provides the image loader, the session that tracks running programs, and the
//! `Simulator` that owns the CPU and drives its fetch loop.

/// Raw and ELF image loading.
pub mod loader;

/// Running-program accounting.
pub mod session;

/// The top-level fetch loop.
pub mod simulator;

pub use loader::LoadedImage;
pub use session::Session;
pub use simulator::{RunOutcome, Simulator};
