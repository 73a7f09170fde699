//! Packet framing and hex conversion.
//!
//! Every GDB packet is `$<payload>#<checksum>`, where the checksum is the sum of the
//! payload bytes modulo 256 written as two hex digits. Numbers inside payloads are
//! hexadecimal.

use std::fmt::Write as _;

/// Start-of-packet marker.
pub const PACKET_START: u8 = b'$';
/// End-of-payload marker.
pub const PACKET_END: u8 = b'#';
/// Positive acknowledge.
pub const ACK: u8 = b'+';
/// Negative acknowledge; the sender retransmits.
pub const NACK: u8 = b'-';
/// Out-of-band interrupt byte (Ctrl-C).
pub const INTERRUPT: u8 = 0x03;
/// Incoming bytes are 7-bit.
pub const CHAR_MASK: u8 = 0x7F;

/// Sum of the payload bytes modulo 256.
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

/// Value of one hex digit, either case.
pub const fn hex_value(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None,
    }
}

/// Parses the two checksum digits that follow `#`.
pub fn parse_checksum(hi: u8, lo: u8) -> Option<u8> {
    Some((hex_value(hi)? << 4) | hex_value(lo)?)
}

/// Parses a hexadecimal number with an optional `0x` prefix.
///
/// An empty string is zero. Returns `None` for a non-hex digit or more than
/// eight significant digits.
pub fn parse_hex(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    digits.bytes().try_fold(0u32, |acc, ch| {
        let digit = u32::from(hex_value(ch)?);
        acc.checked_mul(16).map(|v| v | digit)
    })
}

/// Encodes bytes as lowercase hex, two digits per byte.
pub fn encode_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Decodes pairs of hex digits into bytes.
///
/// A dangling final digit is dropped with a warning. Returns `None` if a pair
/// is not valid hex.
pub fn decode_bytes(text: &str) -> Option<Vec<u8>> {
    let raw = text.as_bytes();
    if raw.len() % 2 != 0 {
        tracing::warn!(text, "hex data has an odd number of digits");
    }
    raw.chunks_exact(2)
        .map(|pair| Some((hex_value(pair[0])? << 4) | hex_value(pair[1])?))
        .collect()
}

/// Decodes a hex-encoded string, as carried by `qRcmd`.
///
/// An odd-length input is logged and yields an empty string; invalid digits also
/// yield an empty string.
pub fn hex_to_text(text: &str) -> String {
    if text.len() % 2 != 0 {
        tracing::warn!(text, "hexadecimal string contains an odd number of characters");
        return String::new();
    }
    decode_bytes(text)
        .map(|bytes| bytes.into_iter().map(char::from).collect())
        .unwrap_or_default()
}

/// Wraps a payload into a complete packet.
pub fn frame(payload: &str) -> Vec<u8> {
    let mut packet = Vec::with_capacity(payload.len() + 4);
    packet.push(PACKET_START);
    packet.extend_from_slice(payload.as_bytes());
    packet.push(PACKET_END);
    packet.extend_from_slice(format!("{:02x}", checksum(payload.as_bytes())).as_bytes());
    packet
}

/// Number formatting for values embedded in stop replies.
///
/// When the debugger host and the target differ in byte order, values wider than
/// one byte are byte swapped before being written out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexFormat {
    /// The debugger host shares the target's byte order.
    pub same_endianness: bool,
}

impl HexFormat {
    /// Creates a formatter.
    pub const fn new(same_endianness: bool) -> Self {
        Self { same_endianness }
    }

    /// Formats `value` in hex, zero padded to `width` digits when given.
    pub fn format(self, value: u32, width: Option<usize>) -> String {
        let value = if !self.same_endianness && value & 0xFFFF_FF00 != 0 {
            value.swap_bytes()
        } else {
            value
        };
        match width {
            Some(width) => format!("{value:0width$x}"),
            None => format!("{value:x}"),
        }
    }
}
