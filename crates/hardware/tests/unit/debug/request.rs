//! # Request Parsing Tests

use leon3_core::debug::request::{BreakpointKind, GdbRequest};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case::extended("!", GdbRequest::ExtendedMode)]
#[case::stop_reason("?", GdbRequest::StopReason)]
#[case::continue_here("c", GdbRequest::Continue { addr: None })]
#[case::continue_at("c40000010", GdbRequest::Continue { addr: Some(0x4000_0010) })]
#[case::continue_signal("C05;40000000", GdbRequest::ContinueSignal { signal: 5, addr: Some(0x4000_0000) })]
#[case::step("s", GdbRequest::Step { addr: None })]
#[case::step_signal("S05", GdbRequest::StepSignal { signal: 5, addr: None })]
#[case::detach("D", GdbRequest::Detach)]
#[case::kill("k", GdbRequest::Kill)]
#[case::read_registers("g", GdbRequest::ReadRegisters)]
#[case::write_registers("G0000000a", GdbRequest::WriteRegisters { data: vec![0, 0, 0, 0x0a] })]
#[case::set_thread_all("Hc-1", GdbRequest::SetThread { op: 'c', thread: -1 })]
#[case::set_thread("Hg0", GdbRequest::SetThread { op: 'g', thread: 0 })]
#[case::cycle_step("i", GdbRequest::CycleStep { addr: None, count: 1 })]
#[case::cycle_step_count("i100,4", GdbRequest::CycleStep { addr: Some(0x100), count: 4 })]
#[case::signal_cycle_step("I", GdbRequest::SignalCycleStep)]
#[case::read_memory("m40000000,8", GdbRequest::ReadMemory { addr: 0x4000_0000, len: 8 })]
#[case::read_register("p44", GdbRequest::ReadRegister { reg: 0x44 })]
#[case::write_register("P44=40000100", GdbRequest::WriteRegister { reg: 0x44, value: 0x4000_0100 })]
#[case::write_register_without_value("P44", GdbRequest::WriteRegister { reg: 0x44, value: 0 })]
#[case::search("t40000000:12,ff", GdbRequest::Search { addr: 0x4000_0000, pattern: 0x12, mask: 0xff })]
#[case::thread_alive("T1", GdbRequest::ThreadAlive { thread: 1 })]
#[case::verbose("vCont?", GdbRequest::Verbose { command: "Cont?".into() })]
#[case::insert("Z0,40000008,4", GdbRequest::InsertBreakpoint { kind: 0, addr: 0x4000_0008, len: 4 })]
#[case::remove("z2,40000100,4", GdbRequest::RemoveBreakpoint { kind: 2, addr: 0x4000_0100, len: 4 })]
fn test_parse_requests(#[case] payload: &str, #[case] expected: GdbRequest) {
    assert_eq!(GdbRequest::parse(payload), expected);
}

#[test]
fn test_write_memory_keeps_data() {
    assert_eq!(
        GdbRequest::parse("M40000000,4:deadbeef"),
        GdbRequest::WriteMemory {
            addr: 0x4000_0000,
            len: 4,
            data: vec![0xde, 0xad, 0xbe, 0xef],
        }
    );
}

#[test]
fn test_write_memory_length_mismatch_is_tolerated() {
    assert_eq!(
        GdbRequest::parse("M40000000,8:dead"),
        GdbRequest::WriteMemory {
            addr: 0x4000_0000,
            len: 8,
            data: vec![0xde, 0xad],
        }
    );
}

#[test]
fn test_query_decodes_extension() {
    assert_eq!(
        GdbRequest::parse("qRcmd,68656c70"),
        GdbRequest::Query {
            command: "Rcmd".into(),
            extension: "help".into(),
        }
    );
    assert_eq!(GdbRequest::parse("qSupported"), GdbRequest::Unknown);
}

#[rstest]
#[case::empty("")]
#[case::unknown_letter("x1234")]
#[case::bad_address("m4000zzzz,4")]
#[case::missing_length("m40000000")]
#[case::bad_breakpoint("Z0,40000000")]
fn test_malformed_requests_are_unknown(#[case] payload: &str) {
    assert_eq!(GdbRequest::parse(payload), GdbRequest::Unknown);
}

#[test]
fn test_breakpoint_type_numbers() {
    assert_eq!(BreakpointKind::from_type(0), Some(BreakpointKind::Software));
    assert_eq!(BreakpointKind::from_type(4), Some(BreakpointKind::AccessWatch));
    assert_eq!(BreakpointKind::from_type(5), None);
}
