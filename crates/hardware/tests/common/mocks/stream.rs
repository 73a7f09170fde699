use std::io::Write;
use std::sync::{Arc, Mutex};

/// Write half of a fake GDB socket; clones share the captured bytes.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn bytes(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }

    /// Everything written so far, as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    /// Payloads of the `$...#xx` packets written so far, in order.
    pub fn packets(&self) -> Vec<String> {
        let bytes = self.bytes();
        let mut packets = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'$' {
                let start = i + 1;
                let end = start
                    + bytes[start..]
                        .iter()
                        .position(|&b| b == b'#')
                        .expect("packet is terminated");
                packets.push(String::from_utf8_lossy(&bytes[start..end]).into_owned());
                i = end + 3;
            } else {
                i += 1;
            }
        }
        packets
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
