//! # Response Encoding Tests

use leon3_core::debug::packet::HexFormat;
use leon3_core::debug::response::GdbResponse;
use pretty_assertions::assert_eq;
use rstest::rstest;

const SAME: HexFormat = HexFormat::new(true);

#[rstest]
#[case::signal(GdbResponse::Signal(5), "S05")]
#[case::exited(GdbResponse::Exited(3), "W03")]
#[case::terminated(GdbResponse::Terminated(9), "X9")]
#[case::output(GdbResponse::Output("hi\n".into()), "O68690a")]
#[case::ok(GdbResponse::Ok, "OK")]
#[case::error(GdbResponse::Error(0), "E00")]
#[case::memory(GdbResponse::Memory(vec![0x91, 0xd0, 0x20, 0x00]), "91d02000")]
#[case::cont_actions(GdbResponse::ContActions(vec!['c', 's']), "vCont;c;s")]
#[case::not_supported(GdbResponse::NotSupported, "")]
fn test_encode(#[case] response: GdbResponse, #[case] expected: &str) {
    assert_eq!(response.encode(SAME), expected);
}

#[test]
fn test_stop_reply_lists_key_values() {
    let stop = GdbResponse::Stop {
        signal: 5,
        info: vec![("watch".into(), 0x4000_0100)],
        size: 4,
    };
    assert_eq!(stop.encode(SAME), "T05watch:40000100;");
    assert_eq!(stop.encode(HexFormat::new(false)), "T05watch:00010040;");
}

#[test]
fn test_only_exit_ends_session() {
    assert!(GdbResponse::Exited(0).ends_session());
    assert!(!GdbResponse::Terminated(9).ends_session());
    assert!(!GdbResponse::Signal(5).ends_session());
}
