//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the LEON3 simulator. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived metrics (CPI, MIPS).
//! 2. **Instruction mix:** Counts by category (ALU, load, store, control, multiply/divide, window, system).
//! 3. **Privilege:** Cycles spent in user and supervisor mode.
//! 4. **Stalls:** Cycles reported by multi-cycle instructions.
//! 5. **Traps:** Exceptions and interrupts taken, and annulled delay slots.

use std::time::Instant;

use crate::isa::Instruction;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulated cycles elapsed.
    pub cycles: u64,
    /// Number of instructions retired, including ones that trapped.
    pub instructions_retired: u64,

    /// Count of integer load instructions.
    pub inst_load: u64,
    /// Count of integer store instructions.
    pub inst_store: u64,
    /// Count of atomic load-store instructions.
    pub inst_atomic: u64,
    /// Count of branches, calls, jumps and returns.
    pub inst_control: u64,
    /// Count of arithmetic, logic, shift and SETHI instructions.
    pub inst_alu: u64,
    /// Count of multiply, divide and multiply-accumulate instructions.
    pub inst_muldiv: u64,
    /// Count of SAVE and RESTORE.
    pub inst_window: u64,
    /// Count of special-register, Ticc, FLUSH, STBAR and UNIMP instructions.
    pub inst_system: u64,

    /// Cycles spent with PSR.S clear.
    pub cycles_user: u64,
    /// Cycles spent with PSR.S set.
    pub cycles_supervisor: u64,

    /// Extra cycles reported by multi-cycle instructions.
    pub stall_cycles: u64,
    /// Delay-slot instructions skipped by the annul bit.
    pub annulled: u64,

    /// Number of exceptions taken (interrupts included).
    pub traps_taken: u64,
    /// Number of external interrupts taken.
    pub interrupts_taken: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_load: 0,
            inst_store: 0,
            inst_atomic: 0,
            inst_control: 0,
            inst_alu: 0,
            inst_muldiv: 0,
            inst_window: 0,
            inst_system: 0,
            cycles_user: 0,
            cycles_supervisor: 0,
            stall_cycles: 0,
            annulled: 0,
            traps_taken: 0,
            interrupts_taken: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"core"`, `"instruction_mix"`, `"traps"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "core", "instruction_mix", "traps"];

impl SimStats {
    /// Counts one executed instruction in its mix category.
    pub fn record_instruction(&mut self, inst: &Instruction) {
        self.instructions_retired += 1;
        let slot = match inst {
            Instruction::Alu { op, .. } if op.is_simple() => &mut self.inst_alu,
            Instruction::Alu { .. } => &mut self.inst_muldiv,
            Instruction::Sethi { .. } => &mut self.inst_alu,
            Instruction::Load { .. } => &mut self.inst_load,
            Instruction::Store { .. } => &mut self.inst_store,
            Instruction::Atomic { .. } => &mut self.inst_atomic,
            Instruction::Branch { .. }
            | Instruction::Call { .. }
            | Instruction::Jmpl { .. }
            | Instruction::Rett { .. } => &mut self.inst_control,
            Instruction::Save { .. } | Instruction::Restore { .. } => &mut self.inst_window,
            Instruction::Ticc { .. }
            | Instruction::ReadSpecial { .. }
            | Instruction::WriteSpecial { .. }
            | Instruction::Stbar
            | Instruction::Flush { .. }
            | Instruction::Unimp { .. }
            | Instruction::Interrupt { .. } => &mut self.inst_system,
        };
        *slot += 1;
    }

    /// Adds `cycles` to the total and to the privilege bucket.
    pub const fn record_cycles(&mut self, cycles: u64, supervisor: bool) {
        self.cycles += cycles;
        if supervisor {
            self.cycles_supervisor += cycles;
        } else {
            self.cycles_user += cycles;
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an empty
    /// slice to print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64().max(f64::EPSILON);
        let cyc = self.cycles.max(1) as f64;
        let instr = self.instructions_retired.max(1) as f64;
        let pct = |n: u64, of: f64| (n as f64 / of) * 100.0;

        if want("summary") {
            let mips = (self.instructions_retired as f64 / seconds) / 1_000_000.0;
            let khz = (self.cycles as f64 / seconds) / 1000.0;
            println!("\n==========================================================");
            println!("LEON3 SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_freq                 {khz:.2} kHz");
            println!("sim_insts                {}", self.instructions_retired);
            println!(
                "sim_ipc                  {:.4}",
                self.instructions_retired as f64 / cyc
            );
            println!("sim_cpi                  {:.4}", cyc / instr);
            println!("sim_mips                 {mips:.2}");
            println!("----------------------------------------------------------");
        }
        if want("core") {
            println!("CORE BREAKDOWN");
            println!(
                "  cycles.user            {} ({:.2}%)",
                self.cycles_user,
                pct(self.cycles_user, cyc)
            );
            println!(
                "  cycles.supervisor      {} ({:.2}%)",
                self.cycles_supervisor,
                pct(self.cycles_supervisor, cyc)
            );
            println!(
                "  stalls                 {} ({:.2}%)",
                self.stall_cycles,
                pct(self.stall_cycles, cyc)
            );
            println!("----------------------------------------------------------");
        }
        if want("instruction_mix") {
            println!("INSTRUCTION MIX");
            for (name, n) in [
                ("alu", self.inst_alu),
                ("muldiv", self.inst_muldiv),
                ("load", self.inst_load),
                ("store", self.inst_store),
                ("atomic", self.inst_atomic),
                ("control", self.inst_control),
                ("window", self.inst_window),
                ("system", self.inst_system),
            ] {
                println!("  op.{name:<19} {n} ({:.2}%)", pct(n, instr));
            }
            println!("----------------------------------------------------------");
        }
        if want("traps") {
            println!("TRAPS");
            println!("  traps.taken            {}", self.traps_taken);
            println!("  traps.interrupts       {}", self.interrupts_taken);
            println!("  delay_slots.annulled   {}", self.annulled);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
