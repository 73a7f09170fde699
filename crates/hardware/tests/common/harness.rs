use leon3_core::Simulator;
use leon3_core::common::data::Asi;
use leon3_core::common::error::SimError;
use leon3_core::config::Config;
use leon3_core::core::{Cpu, StepOutcome};
use tracing_subscriber::EnvFilter;

/// Base of the RAM region used by most tests.
pub const RAM_BASE: u32 = 0x4000_0000;
/// Size of the RAM region used by most tests.
pub const RAM_SIZE: u32 = 0x1_0000;

/// Installs a test-friendly tracing subscriber once; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Default configuration with a small RAM region at [`RAM_BASE`].
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.memory.ram_base = RAM_BASE;
    config.memory.ram_size = RAM_SIZE;
    config.general.start_pc = RAM_BASE;
    config
}

pub struct TestContext {
    pub sim: Simulator,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Builds a context from an arbitrary (valid) configuration.
    pub fn with_config(config: Config) -> Self {
        init_tracing();
        let sim = Simulator::new(&config).expect("test configuration is valid");
        Self { sim }
    }

    /// RAM at `base` of `size` bytes; execution starts at `base`.
    pub fn with_ram(base: u32, size: u32) -> Self {
        let mut config = test_config();
        config.memory.ram_base = base;
        config.memory.ram_size = size;
        config.general.start_pc = base;
        Self::with_config(config)
    }

    /// TSIM-compatible reset: traps enabled, `WIM = 2`.
    pub fn tsim() -> Self {
        let mut config = test_config();
        config.cpu.tsim_compat = true;
        Self::with_config(config)
    }

    /// Convenience accessor for the CPU.
    pub fn cpu(&self) -> &Cpu {
        &self.sim.cpu
    }

    /// Mutable convenience accessor for the CPU.
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.sim.cpu
    }

    /// Stores instruction words at `addr` and points PC/NPC at the first one.
    pub fn load_program(mut self, addr: u32, instructions: &[u32]) -> Self {
        for (i, inst) in instructions.iter().enumerate() {
            self.write_word(addr + (i as u32) * 4, *inst);
        }
        self.sim.cpu.jump_to(addr);
        self
    }

    pub fn write_word(&mut self, addr: u32, value: u32) {
        self.sim
            .cpu
            .memory
            .write_word(addr, value, Asi::SUPERVISOR_DATA)
            .expect("test address is mapped");
    }

    pub fn read_word(&mut self, addr: u32) -> u32 {
        self.sim
            .cpu
            .memory
            .read_word(addr, Asi::SUPERVISOR_DATA)
            .expect("test address is mapped")
    }

    /// Set a logical integer register in the current window.
    pub fn set_reg(&mut self, reg: u32, val: u32) {
        self.sim.cpu.regs.write(reg as usize, val);
    }

    /// Read a logical integer register in the current window.
    pub fn get_reg(&self, reg: u32) -> u32 {
        self.sim.cpu.regs.read(reg as usize)
    }

    /// Executes one instruction; fatal errors fail the test.
    pub fn step(&mut self) -> StepOutcome {
        self.sim.step().expect("step completes")
    }

    /// Executes one instruction and returns the raw result.
    pub fn try_step(&mut self) -> Result<StepOutcome, SimError> {
        self.sim.step()
    }

    /// Executes `n` instructions.
    pub fn run(&mut self, n: usize) {
        for _ in 0..n {
            let _ = self.step();
        }
    }

    /// Trap type currently latched in `%tbr`.
    pub fn trap_type(&self) -> u32 {
        (self.sim.cpu.tbr >> 4) & 0xFF
    }
}
