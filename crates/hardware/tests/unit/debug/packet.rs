//! # Packet Codec Tests

use leon3_core::debug::packet::{
    HexFormat, checksum, decode_bytes, encode_bytes, frame, hex_to_text, hex_value,
    parse_checksum, parse_hex,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

#[test]
fn test_checksum_and_frame() {
    assert_eq!(checksum(b"OK"), 0x9a);
    assert_eq!(checksum(b""), 0);
    assert_eq!(frame("OK"), b"$OK#9a".to_vec());
    assert_eq!(frame(""), b"$#00".to_vec());
}

#[test]
fn test_hex_digits_either_case() {
    assert_eq!(hex_value(b'7'), Some(7));
    assert_eq!(hex_value(b'b'), Some(11));
    assert_eq!(hex_value(b'F'), Some(15));
    assert_eq!(hex_value(b'g'), None);
    assert_eq!(parse_checksum(b'9', b'A'), Some(0x9a));
    assert_eq!(parse_checksum(b'x', b'0'), None);
}

#[rstest]
#[case::plain("40000000", Some(0x4000_0000))]
#[case::prefixed("0x1f", Some(0x1f))]
#[case::upper("ABCDEF", Some(0xab_cdef))]
#[case::empty("", Some(0))]
#[case::leading_zeros("000000044", Some(0x44))]
#[case::too_wide("123456789", None)]
#[case::not_hex("12z", None)]
fn test_parse_hex(#[case] text: &str, #[case] expected: Option<u32>) {
    assert_eq!(parse_hex(text), expected);
}

#[test]
fn test_byte_encoding_is_lowercase() {
    assert_eq!(encode_bytes(&[0xDE, 0xAD, 0x01]), "dead01");
    assert_eq!(decode_bytes("DEad01"), Some(vec![0xDE, 0xAD, 0x01]));
}

#[test]
fn test_decode_bytes_drops_dangling_digit() {
    assert_eq!(decode_bytes("abc"), Some(vec![0xab]));
    assert_eq!(decode_bytes("zz"), None);
}

#[test]
fn test_hex_to_text() {
    assert_eq!(hex_to_text("68656c70"), "help");
    assert_eq!(hex_to_text("68656"), "");
    assert_eq!(hex_to_text("zz"), "");
}

#[rstest]
#[case::same_order(true, 0x1234_5678, Some(8), "12345678")]
#[case::swapped(false, 0x1234_5678, Some(8), "78563412")]
#[case::single_byte_not_swapped(false, 0x05, Some(2), "05")]
#[case::unpadded(true, 0x1f, None, "1f")]
fn test_hex_format(
    #[case] same: bool,
    #[case] value: u32,
    #[case] width: Option<usize>,
    #[case] expected: &str,
) {
    assert_eq!(HexFormat::new(same).format(value, width), expected);
}

proptest! {
    #[test]
    fn encoded_bytes_decode_back(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        prop_assert_eq!(decode_bytes(&encode_bytes(&bytes)), Some(bytes));
    }

    #[test]
    fn framed_checksum_matches_payload(payload in "[a-zA-Z0-9;:,]{0,32}") {
        let packet = frame(&payload);
        let n = packet.len();
        let sum = parse_checksum(packet[n - 2], packet[n - 1]);
        prop_assert_eq!(sum, Some(checksum(payload.as_bytes())));
    }
}
