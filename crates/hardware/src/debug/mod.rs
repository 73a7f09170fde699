//! GDB Remote Serial Protocol support.
//!
//! This module lets a GDB client drive the simulator over TCP. It is split into:
//! 1. **Packet Codec:** Checksums, hex encoding and `$<payload>#<checksum>` framing.
//! 2. **Requests and Responses:** Typed forms of the packets GDB sends and the replies the stub sends.
//! 3. **Connection:** The socket, its reader thread and the acknowledge/retransmit discipline.
//! 4. **Break/Watchpoints:** Address-keyed breakpoints and per-byte watchpoints.
//! 5. **Stub:** The driver loop that turns requests into simulator operations.

/// Breakpoint and watchpoint managers.
pub mod breakpoints;

/// Socket connection with the GDB client.
pub mod connection;

/// Checksums, hex conversion and packet framing.
pub mod packet;

/// Requests received from GDB.
pub mod request;

/// Responses sent to GDB.
pub mod response;

/// Debugger driver loop.
pub mod stub;

use thiserror::Error;

pub use breakpoints::{BreakpointManager, WatchKind, Watchpoint, WatchpointManager};
pub use connection::GdbConnection;
pub use packet::HexFormat;
pub use request::{BreakpointKind, GdbRequest};
pub use response::GdbResponse;
pub use stub::{GdbStub, StopReason};

/// Failure of the debugger connection.
#[derive(Debug, Error)]
pub enum GdbError {
    /// Reading from or writing to the socket failed.
    #[error("GDB connection I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The listening socket could not be set up.
    #[error("cannot accept a GDB connection on port {port}: {source}")]
    Bind {
        /// Requested TCP port.
        port: u16,
        /// Underlying socket error.
        #[source]
        source: std::io::Error,
    },

    /// The client closed the connection.
    #[error("GDB client closed the connection")]
    Disconnected,
}
