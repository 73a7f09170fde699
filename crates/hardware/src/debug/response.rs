//! Responses sent to GDB.

use super::packet::{HexFormat, encode_bytes};

/// A reply to GDB, before framing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GdbResponse {
    /// `S<sig>`: the target stopped with a signal.
    Signal(u8),
    /// `T<sig>key:value;...`: stop with extra information (watchpoint hits).
    Stop {
        /// Signal number.
        signal: u8,
        /// `key:value` pairs, values formatted at `size` bytes.
        info: Vec<(String, u32)>,
        /// Width of each value in bytes.
        size: usize,
    },
    /// `W<code>`: the program exited.
    Exited(u8),
    /// `X<sig>`: the program was terminated by a signal.
    Terminated(u8),
    /// `O<hex>`: text for the debugger console.
    Output(String),
    /// `OK`.
    Ok,
    /// `E<nn>`.
    Error(u8),
    /// Memory contents.
    Memory(Vec<u8>),
    /// Register contents.
    Registers(Vec<u8>),
    /// `vCont;a;b`: the supported resume actions.
    ContActions(Vec<char>),
    /// Empty packet: the request is not supported.
    NotSupported,
}

impl GdbResponse {
    /// Renders the packet payload.
    pub fn encode(&self, format: HexFormat) -> String {
        match self {
            Self::Signal(signal) => format!("S{signal:02x}"),
            Self::Stop { signal, info, size } => {
                let mut payload = format!("T{signal:02x}");
                for (key, value) in info {
                    payload.push_str(key);
                    payload.push(':');
                    payload.push_str(&format.format(*value, Some(size * 2)));
                    payload.push(';');
                }
                payload
            }
            Self::Exited(code) => format!("W{code:02x}"),
            Self::Terminated(signal) => format!("X{}", format.format(u32::from(*signal), None)),
            Self::Output(message) => format!("O{}", encode_bytes(message.as_bytes())),
            Self::Ok => "OK".to_string(),
            Self::Error(code) => format!("E{code:02x}"),
            Self::Memory(data) | Self::Registers(data) => encode_bytes(data),
            Self::ContActions(actions) => {
                let mut payload = String::from("vCont");
                for action in actions {
                    payload.push(';');
                    payload.push(*action);
                }
                payload
            }
            Self::NotSupported => String::new(),
        }
    }

    /// Returns `true` for replies after which the session is over.
    pub const fn ends_session(&self) -> bool {
        matches!(self, Self::Exited(_))
    }
}
