//! LEON3 simulator CLI.
//!
//! This binary loads a program image and runs it. It performs:
//! 1. **Configuration:** Built-in defaults, optionally overridden by a JSON file and then by flags.
//! 2. **Loading:** A raw binary at the load address or a big-endian SPARC ELF at its segment addresses.
//! 3. **Execution:** A free run, or a run under the GDB stub when `--gdb` is given.
//! 4. **Reporting:** The statistics report; the process exits with the program's exit code.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use leon3_core::config::{Config, ExecutionModel};
use leon3_core::debug::GdbStub;
use leon3_core::sim::{RunOutcome, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "leon3sim",
    author,
    version,
    about = "SPARC V8 (LEON3) instruction-accurate simulator",
    long_about = "Run a raw binary or a SPARC ELF image, optionally under a GDB remote stub.\n\nExamples:\n  leon3sim run hello.elf\n  leon3sim run --load-addr 0x40000000 --stop-on-ta boot.bin\n  leon3sim run --gdb 1234 hello.elf   (then `target remote :1234` in sparc-elf-gdb)"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program image.
    Run {
        /// Raw binary or ELF image to execute.
        image: PathBuf,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Wait for a GDB client on this TCP port before running.
        #[arg(long)]
        gdb: Option<u16>,

        /// Entry point, overriding the one of the image.
        #[arg(long, value_parser = parse_addr)]
        entry: Option<u32>,

        /// Load address of a raw binary (default: RAM base).
        #[arg(long, value_parser = parse_addr)]
        load_addr: Option<u32>,

        /// Stop after this many instructions.
        #[arg(long)]
        max_instructions: Option<u64>,

        /// Treat `ta 0` as program exit with `%o0` as the exit code.
        #[arg(long)]
        stop_on_ta: bool,

        /// Use the timed cycle model instead of one cycle per instruction.
        #[arg(long)]
        timed: bool,

        /// Log every executed instruction.
        #[arg(long)]
        trace: bool,

        /// Print only these statistics sections (summary, core, instruction_mix, traps).
        #[arg(long, value_delimiter = ',')]
        stats: Vec<String>,

        /// Print the effective configuration as JSON before running.
        #[arg(long)]
        print_config: bool,
    },
}

/// Parses a decimal or `0x`-prefixed hexadecimal address.
fn parse_addr(text: &str) -> Result<u32, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid address `{text}`: {e}"))
}

fn init_tracing(trace: bool) {
    let filter = if trace {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let Cli {
        command:
            Commands::Run {
                image,
                config,
                gdb,
                entry,
                load_addr,
                max_instructions,
                stop_on_ta,
                timed,
                trace,
                stats,
                print_config,
            },
    } = Cli::parse();
    init_tracing(trace);

    let mut config = match config {
        Some(path) => match Config::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(path = %path.display(), %err, "cannot load configuration");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };
    if gdb.is_some() {
        config.debug.gdb_port = gdb;
    }
    if max_instructions.is_some() {
        config.general.max_instructions = max_instructions;
    }
    config.general.stop_on_ta |= stop_on_ta;
    config.general.trace_instructions |= trace;
    if timed {
        config.general.execution_model = ExecutionModel::Timed;
    }

    if print_config {
        match serde_json::to_string_pretty(&config) {
            Ok(json) => println!("{json}"),
            Err(err) => tracing::warn!(%err, "cannot serialize configuration"),
        }
    }

    let mut sim = match Simulator::new(&config) {
        Ok(sim) => sim,
        Err(err) => {
            tracing::error!(%err, "cannot build simulator");
            return ExitCode::FAILURE;
        }
    };
    let load_addr = load_addr.unwrap_or(config.memory.ram_base);
    if let Err(err) = sim.load_image(&image, load_addr, entry) {
        tracing::error!(image = %image.display(), %err, "cannot load image");
        return ExitCode::FAILURE;
    }

    let outcome = match config.debug.gdb_port {
        Some(port) => match GdbStub::listen(port, config.debug.gdb_same_endianness) {
            Ok(mut stub) => stub.run(&mut sim),
            Err(err) => {
                tracing::error!(%err, "cannot start GDB stub");
                return ExitCode::FAILURE;
            }
        },
        None => sim.run(),
    };

    match outcome {
        Ok(RunOutcome::Exited(code)) => {
            println!("\n[*] Program exited with code {code}");
            sim.cpu.stats.print_sections(&stats);
            ExitCode::from(code as u8)
        }
        Ok(RunOutcome::InstructionLimit) => {
            println!("\n[*] Instruction limit reached at pc {:#010x}", sim.cpu.pc);
            sim.cpu.stats.print_sections(&stats);
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Killed) => {
            println!("\n[*] Program killed by the debugger");
            sim.cpu.stats.print_sections(&stats);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("\n[!] FATAL: {err}");
            sim.cpu.dump_state();
            sim.cpu.stats.print_sections(&stats);
            ExitCode::FAILURE
        }
    }
}
