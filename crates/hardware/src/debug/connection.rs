//! Connection with the GDB client.
//!
//! A reader thread drains the socket into a queue so that an out-of-band interrupt
//! (Ctrl-C) is seen while the simulated CPU runs. The protocol side consumes the
//! queue one byte at a time:
//! 1. **Requests:** Bytes are skipped up to `$`, the payload is collected up to `#`, and
//!    the two checksum digits are verified; the packet is acknowledged with `+` or `-`
//!    and a bad packet is read again.
//! 2. **Responses:** A framed reply is resent until GDB acknowledges it with `+`. Stray
//!    bytes before the acknowledge are answered with `$E00#a5` and the reply is resent.
//! 3. **Shutdown:** End of stream is a sticky condition of the queue; once seen, every
//!    read returns it and the connection is marked killed.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use super::GdbError;
use super::packet::{
    ACK, CHAR_MASK, HexFormat, INTERRUPT, NACK, PACKET_END, PACKET_START, checksum, frame,
    parse_checksum,
};
use super::request::GdbRequest;
use super::response::GdbResponse;

/// Reply sent when the acknowledge was preceded by garbage.
const GARBLED_ACK_REPLY: &[u8] = b"$E00#a5";

/// Signal reported by [`GdbConnection::send_interrupt`].
const SIGTRAP: u8 = 5;

/// What the queue yields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Incoming {
    Byte(u8),
    Interrupt,
    Closed,
}

#[derive(Debug, Default)]
struct InboxState {
    bytes: VecDeque<u8>,
    interrupted: bool,
    closed: bool,
}

/// Byte queue shared by the reader thread and the protocol side.
#[derive(Debug, Default)]
struct Inbox {
    state: Mutex<InboxState>,
    ready: Condvar,
}

impl Inbox {
    fn lock(&self) -> MutexGuard<'_, InboxState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, byte: u8) {
        self.lock().bytes.push_back(byte);
        self.ready.notify_all();
    }

    fn interrupt(&self) {
        self.lock().interrupted = true;
        self.ready.notify_all();
    }

    fn close(&self) {
        self.lock().closed = true;
        self.ready.notify_all();
    }

    /// Closed with nothing left to deliver.
    fn is_exhausted(&self) -> bool {
        let state = self.lock();
        state.closed && state.bytes.is_empty()
    }

    fn take_interrupt(&self) -> bool {
        std::mem::take(&mut self.lock().interrupted)
    }

    /// Blocks until a byte is queued or the stream is closed.
    ///
    /// Queued bytes are delivered before the close. With `wake_on_interrupt`, a
    /// pending interrupt is also returned (and consumed).
    fn pop(&self, wake_on_interrupt: bool) -> Incoming {
        let mut state = self.lock();
        loop {
            if let Some(byte) = state.bytes.pop_front() {
                return Incoming::Byte(byte);
            }
            if wake_on_interrupt && state.interrupted {
                state.interrupted = false;
                return Incoming::Interrupt;
            }
            if state.closed {
                return Incoming::Closed;
            }
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Copies the incoming stream into the inbox until end of stream.
fn read_loop(mut reader: impl Read, inbox: &Inbox) {
    let mut buf = [0u8; 256];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                for &byte in &buf[..n] {
                    if byte & CHAR_MASK == INTERRUPT {
                        inbox.interrupt();
                    } else {
                        inbox.push(byte);
                    }
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
            Err(err) => {
                tracing::debug!(%err, "GDB socket read failed");
                break;
            }
        }
    }
    inbox.close();
}

/// Packet-level connection with one GDB client.
pub struct GdbConnection {
    writer: Box<dyn Write + Send>,
    inbox: Arc<Inbox>,
    killed: AtomicBool,
    format: HexFormat,
    socket: Option<TcpStream>,
}

impl std::fmt::Debug for GdbConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GdbConnection")
            .field("killed", &self.is_killed())
            .field("format", &self.format)
            .field("socket", &self.socket)
            .finish_non_exhaustive()
    }
}

impl GdbConnection {
    /// Listens on `port` and blocks until one client connects.
    ///
    /// # Errors
    ///
    /// `GdbError::Bind` if the port cannot be bound or the accept fails;
    /// `GdbError::Io` if the accepted socket cannot be cloned for the reader thread.
    pub fn initialize(port: u16, same_endianness: bool) -> Result<Self, GdbError> {
        let listener = TcpListener::bind(("0.0.0.0", port))
            .map_err(|source| GdbError::Bind { port, source })?;
        tracing::info!(port, "GDB: waiting for connections");
        let (stream, peer) = listener
            .accept()
            .map_err(|source| GdbError::Bind { port, source })?;
        tracing::info!(port, %peer, "GDB: connection accepted");

        if let Err(err) = stream.set_nodelay(true) {
            tracing::debug!(%err, "cannot disable Nagle on the GDB socket");
        }
        let reader = stream.try_clone()?;
        let writer = stream.try_clone()?;
        let mut connection = Self::from_stream(reader, writer, same_endianness);
        connection.socket = Some(stream);
        Ok(connection)
    }

    /// Runs the protocol over an arbitrary byte stream.
    ///
    /// `reader` is moved to a background thread that feeds the request queue.
    pub fn from_stream<R, W>(reader: R, writer: W, same_endianness: bool) -> Self
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        let inbox = Arc::new(Inbox::default());
        let killed = AtomicBool::new(false);
        {
            let inbox = Arc::clone(&inbox);
            let _reader = thread::spawn(move || read_loop(reader, &inbox));
        }
        Self {
            writer: Box::new(writer),
            inbox,
            killed,
            format: HexFormat::new(same_endianness),
            socket: None,
        }
    }

    /// Number formatting used in replies.
    pub const fn format(&self) -> HexFormat {
        self.format
    }

    /// Returns `true` once the client killed the target or the connection closed.
    ///
    /// Bytes received before the close are still delivered; the connection counts as
    /// closed only when none are left.
    pub fn is_killed(&self) -> bool {
        self.killed.load(Ordering::Acquire) || self.inbox.is_exhausted()
    }

    fn mark_killed(&self) {
        self.killed.store(true, Ordering::Release);
    }

    /// Returns and clears the interrupt flag set by an incoming Ctrl-C.
    pub fn poll_interrupt(&self) -> bool {
        self.inbox.take_interrupt()
    }

    fn read_char(&self) -> Option<u8> {
        match self.inbox.pop(false) {
            Incoming::Byte(byte) => Some(byte),
            Incoming::Interrupt | Incoming::Closed => None,
        }
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), GdbError> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        Ok(())
    }

    fn connection_lost(&self) -> GdbRequest {
        tracing::warn!("connection closed by the GDB client; detaching");
        self.mark_killed();
        GdbRequest::Error
    }

    /// Waits for the next request.
    ///
    /// Returns [`GdbRequest::Interrupt`] if the client sent Ctrl-C while no packet was
    /// in progress, and [`GdbRequest::Error`] if the connection closed or the
    /// acknowledge could not be written.
    pub fn process_request(&mut self) -> GdbRequest {
        let payload = loop {
            loop {
                match self.inbox.pop(true) {
                    Incoming::Byte(byte) if byte & CHAR_MASK == PACKET_START => break,
                    Incoming::Byte(_) => {}
                    Incoming::Interrupt => return GdbRequest::Interrupt,
                    Incoming::Closed => return self.connection_lost(),
                }
            }

            let mut payload = Vec::new();
            loop {
                let Some(byte) = self.read_char() else {
                    return self.connection_lost();
                };
                let byte = byte & CHAR_MASK;
                if byte == PACKET_END {
                    break;
                }
                payload.push(byte);
            }

            let (Some(hi), Some(lo)) = (self.read_char(), self.read_char()) else {
                return self.connection_lost();
            };
            let valid = parse_checksum(hi, lo) == Some(checksum(&payload));
            if let Err(err) = self.write_raw(if valid { &[ACK] } else { &[NACK] }) {
                tracing::warn!(%err, "cannot acknowledge GDB packet");
                return GdbRequest::Error;
            }
            if valid {
                break payload;
            }
            tracing::warn!(
                payload = %String::from_utf8_lossy(&payload),
                "GDB packet checksum mismatch; requesting retransmission"
            );
        };

        let payload = String::from_utf8_lossy(&payload);
        tracing::trace!(packet = %payload, "GDB request");
        let request = GdbRequest::parse(&payload);
        if request == GdbRequest::Kill {
            self.mark_killed();
        }
        request
    }

    /// Sends a reply and waits for GDB to acknowledge it.
    ///
    /// # Errors
    ///
    /// `GdbError::Disconnected` if the connection is already killed or closes while
    /// waiting for the acknowledge; `GdbError::Io` if the socket write fails.
    pub fn send_response(&mut self, response: &GdbResponse) -> Result<(), GdbError> {
        if self.is_killed() {
            return Err(GdbError::Disconnected);
        }
        let payload = response.encode(self.format);
        tracing::trace!(packet = %payload, "GDB response");
        let packet = frame(&payload);

        loop {
            self.write_raw(&packet)?;
            if response.ends_session() {
                self.mark_killed();
                return Ok(());
            }

            let mut resend = false;
            loop {
                let mut reads = 0;
                let ack = loop {
                    let Some(byte) = self.read_char() else {
                        tracing::warn!("connection closed by the GDB client while awaiting an acknowledge");
                        self.mark_killed();
                        return Err(GdbError::Disconnected);
                    };
                    reads += 1;
                    let byte = byte & CHAR_MASK;
                    if byte == ACK || byte == NACK {
                        break byte;
                    }
                };
                if reads > 1 {
                    tracing::warn!(skipped = reads - 1, "garbage before GDB acknowledge");
                    self.write_raw(GARBLED_ACK_REPLY)?;
                    resend = true;
                    continue;
                }
                if ack == NACK {
                    resend = true;
                }
                break;
            }
            if !resend {
                return Ok(());
            }
            tracing::debug!(packet = %payload, "retransmitting GDB response");
        }
    }

    /// Tells GDB the target stopped with `SIGTRAP`.
    ///
    /// # Errors
    ///
    /// As [`GdbConnection::send_response`].
    pub fn send_interrupt(&mut self) -> Result<(), GdbError> {
        self.send_response(&GdbResponse::Signal(SIGTRAP))
    }

    /// Closes the connection; the reader thread exits at end of stream.
    pub fn disconnect(&mut self) {
        self.mark_killed();
        if let Some(socket) = self.socket.take()
            && let Err(err) = socket.shutdown(Shutdown::Both)
        {
            tracing::debug!(%err, "GDB socket shutdown failed");
        }
        self.inbox.close();
    }
}

impl Drop for GdbConnection {
    fn drop(&mut self) {
        self.disconnect();
    }
}
