//! # Debugger Session Tests
//!
//! Each test loads a short program, scripts what a GDB client sends, runs the
//! stub to completion and checks the replies it produced.

use leon3_core::Simulator;
use leon3_core::debug::packet::encode_bytes;
use leon3_core::debug::stub::{
    MAX_MEMORY_READ, SIGILL, SIGTRAP, SIGXCPU, read_register, regnum, write_register,
};
use leon3_core::debug::{GdbConnection, GdbResponse, GdbStub, StopReason};
use leon3_core::isa::opcodes::op3_arith;
use leon3_core::sim::RunOutcome;
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::{alu_imm, mov, nop, reg, sethi, st, ta, unimp};
use crate::common::builder::script::Script;
use crate::common::harness::{RAM_BASE, TestContext, test_config};
use crate::common::mocks::stream::SharedBuffer;

/// `%o0 = 7; nop; %o0 += 1; ta 0` exits with code 8.
fn counting_program() -> Simulator {
    program(&[
        mov(7, reg::O0),
        nop(),
        alu_imm(op3_arith::ADD, reg::O0, reg::O0, 1),
        ta(0),
    ])
}

fn program(words: &[u32]) -> Simulator {
    let mut config = test_config();
    config.general.stop_on_ta = true;
    TestContext::with_config(config)
        .load_program(RAM_BASE, words)
        .sim
}

/// Runs a stub over `script` and returns its outcome, the stub and the replies.
fn debug(
    sim: &mut Simulator,
    script: Script,
    same_endianness: bool,
) -> (RunOutcome, GdbStub, Vec<String>) {
    let out = SharedBuffer::new();
    let connection = GdbConnection::from_stream(script.build(), out.clone(), same_endianness);
    let mut stub = GdbStub::new(connection);
    let outcome = stub.run(sim).expect("debug session completes");
    (outcome, stub, out.packets())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_breakpoint_stop_and_continue_to_exit() {
    let mut sim = counting_program();
    let script = Script::new()
        .exchange("Z0,40000008,4")
        .exchange("c")
        .exchange("p08")
        .exchange("p44")
        .request("c")
        .ack()
        .ack();

    let (outcome, stub, replies) = debug(&mut sim, script, true);

    assert_eq!(outcome, RunOutcome::Exited(8));
    assert_eq!(stub.stop_reason(), StopReason::Exited(8));
    assert_eq!(
        replies,
        vec![
            "OK".to_string(),
            "S05".to_string(),
            "00000007".to_string(),
            "40000008".to_string(),
            format!("O{}", encode_bytes(b"\nProgram Correctly Ended\n")),
            "W08".to_string(),
        ]
    );
    assert!(stub.breakpoints().contains(0x4000_0008));
    assert!(sim.session.is_finished());
}

#[test]
fn test_single_step_and_register_dump() {
    let mut sim = counting_program();
    let script = Script::new().exchange("s").exchange("g").request("k");

    let (outcome, stub, replies) = debug(&mut sim, script, true);

    assert_eq!(outcome, RunOutcome::Killed);
    assert_eq!(stub.stop_reason(), StopReason::Step);
    assert_eq!(replies[0], "S05");
    let dump = &replies[1];
    assert_eq!(dump.len(), 72 * 8);
    let field = |reg: usize| &dump[reg * 8..reg * 8 + 8];
    assert_eq!(field(8), "00000007");
    assert_eq!(field(regnum::PC as usize), "40000004");
    assert_eq!(field(regnum::NPC as usize), "40000008");
    assert_eq!(field(regnum::FSR as usize), "00000000");
}

#[test]
fn test_write_watchpoint_reports_address() {
    let mut sim = program(&[
        sethi(reg::G1, RAM_BASE >> 10),
        mov(5, reg::O0),
        st(reg::O0, reg::G1, 0x100),
        ta(0),
    ]);
    let script = Script::new()
        .exchange("Z2,40000100,4")
        .exchange("c")
        .exchange("z2,40000100,4")
        .request("c")
        .ack()
        .ack();

    let (outcome, stub, replies) = debug(&mut sim, script, true);

    assert_eq!(outcome, RunOutcome::Exited(5));
    assert_eq!(replies[1], "T05watch:40000100;");
    assert_eq!(replies[2], "OK");
    assert!(stub.watchpoints().is_empty());
}

#[test]
fn test_memory_access() {
    let mut sim = counting_program();
    let script = Script::new()
        .exchange("M40000100,4:deadbeef")
        .exchange("m40000100,4")
        .exchange("m40000000,4")
        .request("k");

    let (outcome, _stub, replies) = debug(&mut sim, script, true);

    let first_word = format!("{:08x}", mov(7, reg::O0));
    assert_eq!(outcome, RunOutcome::Killed);
    assert_eq!(replies, strings(&["OK", "deadbeef", first_word.as_str()]));
}

#[test]
fn test_memory_read_is_capped() {
    let mut sim = counting_program();
    let script = Script::new()
        .exchange("m40000000,ffffffff")
        .exchange(&format!("m40000000,{MAX_MEMORY_READ:x}"))
        .request("k");

    let (outcome, _stub, replies) = debug(&mut sim, script, true);

    assert_eq!(outcome, RunOutcome::Killed);
    assert_eq!(replies[0], "E01");
    assert_eq!(replies[1].len(), 2 * MAX_MEMORY_READ as usize);
}

#[test]
fn test_instruction_limit_stops_debugged_run() {
    let mut config = test_config();
    config.general.stop_on_ta = true;
    config.general.max_instructions = Some(2);
    let mut sim = TestContext::with_config(config)
        .load_program(
            RAM_BASE,
            &[
                mov(7, reg::O0),
                nop(),
                alu_imm(op3_arith::ADD, reg::O0, reg::O0, 1),
                ta(0),
            ],
        )
        .sim;
    let script = Script::new()
        .exchange("c")
        .exchange("s")
        .exchange("p44")
        .request("k");

    let (outcome, stub, replies) = debug(&mut sim, script, true);

    assert_eq!(outcome, RunOutcome::Killed);
    assert_eq!(stub.stop_reason(), StopReason::InstructionLimit);
    assert_eq!(replies, strings(&["S18", "S18", "40000008"]));
    assert_eq!(sim.cpu.stats.instructions_retired, 2);
    assert_eq!(
        StopReason::InstructionLimit.reply(),
        GdbResponse::Signal(SIGXCPU)
    );
}

#[test]
fn test_exit_with_lost_connection_skips_exit_reply() {
    let mut sim = counting_program();

    let (outcome, stub, replies) = debug(&mut sim, Script::new().request("c"), true);

    assert_eq!(outcome, RunOutcome::Exited(8));
    assert_eq!(stub.stop_reason(), StopReason::Exited(8));
    assert!(replies.len() <= 1);
    assert!(!replies.contains(&"W08".to_string()));
}

#[test]
fn test_memory_write_outside_ram_fails() {
    let mut sim = counting_program();
    let script = Script::new().exchange("M00000000,2:0102").request("k");

    let (_outcome, _stub, replies) = debug(&mut sim, script, true);

    assert_eq!(replies, strings(&["E00"]));
}

#[test]
fn test_register_writes() {
    let mut sim = counting_program();
    let script = Script::new()
        .exchange("P44=40000008")
        .exchange("p44")
        .exchange("P41=0000001f")
        .exchange("P50=1")
        .exchange("P20=3f800000")
        .request("k");

    let (_outcome, _stub, replies) = debug(&mut sim, script, true);

    assert_eq!(replies, strings(&["OK", "40000008", "E00", "E00", "OK"]));
    assert_eq!(sim.cpu.pc, 0x4000_0008);
    assert_eq!(sim.cpu.npc, RAM_BASE + 4);
}

#[test]
fn test_queries_and_unsupported_packets() {
    let mut sim = counting_program();
    let script = Script::new()
        .exchange("?")
        .exchange("vCont?")
        .exchange("qSupported")
        .exchange("Hg0")
        .exchange("Z5,40000000,4")
        .exchange("z0,40000000,4")
        .request("k");

    let (_outcome, _stub, replies) = debug(&mut sim, script, true);

    assert_eq!(replies, strings(&["S05", "vCont;c;s", "", "OK", "", "E00"]));
}

#[test]
fn test_monitor_help_sends_console_output() {
    let mut sim = counting_program();
    let script = Script::new()
        .request(&format!("qRcmd,{}", encode_bytes(b"help")))
        .ack()
        .ack()
        .request("k");

    let (_outcome, _stub, replies) = debug(&mut sim, script, true);

    assert_eq!(replies.len(), 2);
    assert!(replies[0].starts_with('O'));
    assert_eq!(replies[1], "OK");
}

#[test]
fn test_vcont_step() {
    let mut sim = counting_program();
    let script = Script::new().exchange("vCont;s").request("k");

    let (_outcome, stub, replies) = debug(&mut sim, script, true);

    assert_eq!(replies, strings(&["S05"]));
    assert_eq!(stub.stop_reason(), StopReason::Step);
    assert_eq!(sim.cpu.pc, RAM_BASE + 4);
}

#[test]
fn test_fault_is_reported_as_sigill() {
    let mut sim = program(&[unimp(0)]);
    let script = Script::new().exchange("c").request("k");

    let (outcome, stub, replies) = debug(&mut sim, script, true);

    assert_eq!(outcome, RunOutcome::Killed);
    assert_eq!(stub.stop_reason(), StopReason::Fault);
    assert_eq!(replies, vec![format!("S{SIGILL:02x}")]);
}

#[test]
fn test_detach_runs_program_to_completion() {
    let mut sim = counting_program();
    let script = Script::new().exchange("Z0,40000008,4").exchange("D");

    let (outcome, stub, replies) = debug(&mut sim, script, true);

    assert_eq!(outcome, RunOutcome::Exited(8));
    assert_eq!(replies, strings(&["OK", "OK"]));
    assert!(stub.breakpoints().is_empty());
}

#[test]
fn test_lost_connection_runs_detached() {
    let mut sim = counting_program();

    let (outcome, _stub, replies) = debug(&mut sim, Script::new(), true);

    assert_eq!(outcome, RunOutcome::Exited(8));
    assert!(replies.is_empty());
}

#[test]
fn test_stop_reason_replies() {
    assert_eq!(
        StopReason::Breakpoint(0x4000_0000).reply(),
        StopReason::Step.reply()
    );
    assert_eq!(StopReason::Interrupt.reply(), GdbResponse::Signal(SIGTRAP));
    assert_eq!(StopReason::Exited(3).reply(), GdbResponse::Exited(3));
}

#[test]
fn test_register_map() {
    let mut ctx = TestContext::new();
    let cpu = ctx.cpu_mut();
    assert!(write_register(cpu, regnum::Y, 0x1234));
    assert!(write_register(cpu, regnum::WIM, 0xFFFF_FFFF));
    assert!(write_register(cpu, 40, 0xDEAD));
    assert!(!write_register(cpu, 72, 0));
    assert_eq!(read_register(cpu, regnum::Y), 0x1234);
    assert_eq!(read_register(cpu, regnum::WIM), 0xFF);
    assert_eq!(read_register(cpu, 40), 0);
    assert_eq!(read_register(cpu, regnum::CSR), 0);
}
