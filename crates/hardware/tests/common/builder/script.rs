//! Scripted GDB client input.

use std::io::Cursor;

use leon3_core::debug::packet::frame;

/// Builds the byte stream a GDB client would send.
///
/// Every reply the stub sends waits for an acknowledge, so a script lists one
/// `ack()` per expected reply (`W` replies are not acknowledged).
#[derive(Clone, Debug, Default)]
pub struct Script {
    bytes: Vec<u8>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// A framed request packet.
    pub fn request(mut self, payload: &str) -> Self {
        self.bytes.extend(frame(payload));
        self
    }

    /// A request followed by the acknowledge of its reply.
    pub fn exchange(self, payload: &str) -> Self {
        self.request(payload).ack()
    }

    /// `+`.
    pub fn ack(mut self) -> Self {
        self.bytes.push(b'+');
        self
    }

    /// Arbitrary bytes.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Cursor<Vec<u8>> {
        Cursor::new(self.bytes)
    }
}
