//! Configuration system for the LEON3 simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline processor and memory constants (window count, RAM map).
//! 2. **Structures:** Hierarchical config for general, cpu, memory, and debug settings.
//! 3. **Enums:** The execution model used to account cycles.
//! 4. **Validation:** Range checks applied before a processor is built.
//!
//! Configuration is supplied as JSON (`--config` on the command line) or built with
//! `Config::default()`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::constants::{DEFAULT_NUM_WINDOWS, MAX_WINDOWS, MIN_WINDOWS};

/// Default configuration constants for the simulator.
///
/// These values define the baseline configuration when not
/// explicitly overridden in JSON configuration files.
mod defaults {
    /// Base address of main RAM.
    ///
    /// LEON3 boards map SDRAM at `0x4000_0000`; images are linked there by default.
    pub const RAM_BASE: u32 = 0x4000_0000;

    /// Total size of main RAM (16 MiB).
    pub const RAM_SIZE: u32 = 16 * 1024 * 1024;

    /// Number of instructions between progress log lines while tracing.
    pub const PROGRESS_INTERVAL: u64 = 1_000_000;
}

/// Cycle accounting strategy.
///
/// Selects how the instruction loop advances the cycle counter. The instruction
/// semantics are identical under both models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ExecutionModel {
    /// Instruction-accurate model.
    ///
    /// Every instruction costs one cycle; reported stalls are ignored.
    #[default]
    Functional,
    /// Approximately timed model.
    ///
    /// Every instruction costs one cycle plus the stall cycles it reports.
    #[serde(alias = "Lt", alias = "LT")]
    Timed,
}

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text is not valid JSON for [`Config`].
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// A setting is outside its legal range.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending setting.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use leon3_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.cpu.num_windows, 8);
/// assert_eq!(config.memory.ram_base, 0x4000_0000);
/// ```
///
/// Deserializing from JSON; omitted fields keep their defaults:
///
/// ```
/// use leon3_core::config::{Config, ExecutionModel};
///
/// let json = r#"{
///     "general": { "execution_model": "Timed", "stop_on_ta": true },
///     "cpu": { "num_windows": 16, "tsim_compat": true }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.execution_model, ExecutionModel::Timed);
/// assert_eq!(config.cpu.num_windows, 16);
/// assert_eq!(config.memory.ram_size, 16 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General simulation settings
    pub general: GeneralConfig,
    /// Processor parameters
    pub cpu: CpuConfig,
    /// Main memory configuration
    pub memory: MemoryConfig,
    /// Debugger settings
    pub debug: DebugConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Arguments
    ///
    /// * `json` - JSON text; every section and field is optional.
    ///
    /// # Returns
    ///
    /// The validated configuration, or the parse or range error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks every setting against its legal range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = self.cpu.num_windows;
        if !(MIN_WINDOWS..=MAX_WINDOWS).contains(&windows) {
            return Err(ConfigError::Invalid {
                field: "cpu.num_windows",
                reason: format!("{windows} is outside {MIN_WINDOWS}..={MAX_WINDOWS}"),
            });
        }
        if self.cpu.processor_id > 0xF {
            return Err(ConfigError::Invalid {
                field: "cpu.processor_id",
                reason: format!("{} does not fit in 4 bits", self.cpu.processor_id),
            });
        }
        if self.cpu.tbr_base & 0xFFF != 0 {
            return Err(ConfigError::Invalid {
                field: "cpu.tbr_base",
                reason: format!("{:#x} is not 4 KiB aligned", self.cpu.tbr_base),
            });
        }
        if self.memory.ram_size == 0 || self.memory.ram_size % 8 != 0 {
            return Err(ConfigError::Invalid {
                field: "memory.ram_size",
                reason: format!("{} must be a non-zero multiple of 8", self.memory.ram_size),
            });
        }
        if self
            .memory
            .ram_base
            .checked_add(self.memory.ram_size - 1)
            .is_none()
        {
            return Err(ConfigError::Invalid {
                field: "memory.ram_size",
                reason: "RAM region wraps past the end of the address space".to_string(),
            });
        }
        Ok(())
    }
}

/// General simulation settings and options.
///
/// Contains high-level simulation configuration such as tracing,
/// initial program counter, and termination conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log every executed instruction at TRACE level.
    pub trace_instructions: bool,

    /// Initial PC value when the image does not provide an entry point.
    pub start_pc: u32,

    /// Stop after this many instructions.
    pub max_instructions: Option<u64>,

    /// Cycle accounting strategy.
    pub execution_model: ExecutionModel,

    /// Treat `ta 0` as program exit with `%o0` as the exit code.
    pub stop_on_ta: bool,

    /// Instructions between progress log lines.
    pub progress_interval: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            start_pc: defaults::RAM_BASE,
            max_instructions: None,
            execution_model: ExecutionModel::Functional,
            stop_on_ta: false,
            progress_interval: defaults::PROGRESS_INTERVAL,
        }
    }
}

/// Processor parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuConfig {
    /// Number of register windows (2-32).
    pub num_windows: usize,

    /// Processor index reported in `%asr17` bits 28-31.
    pub processor_id: u32,

    /// Reset with traps enabled and WIM 2, as the TSIM simulator does.
    pub tsim_compat: bool,

    /// Initial trap base address (bits 12-31 of `%tbr`).
    pub tbr_base: u32,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            num_windows: DEFAULT_NUM_WINDOWS,
            processor_id: 0,
            tsim_compat: false,
            tbr_base: 0,
        }
    }
}

/// Main memory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Base address of RAM.
    pub ram_base: u32,

    /// Size of RAM in bytes.
    pub ram_size: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            ram_base: defaults::RAM_BASE,
            ram_size: defaults::RAM_SIZE,
        }
    }
}

/// Debugger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// TCP port of the GDB stub; `None` runs without a debugger.
    pub gdb_port: Option<u16>,

    /// The debugger host shares the target's byte order.
    ///
    /// When `false`, multi-byte values in `T` stop replies are byte swapped.
    /// Defaults to `true` only on big-endian hosts.
    pub gdb_same_endianness: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            gdb_port: None,
            gdb_same_endianness: cfg!(target_endian = "big"),
        }
    }
}
