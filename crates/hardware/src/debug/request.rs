//! Requests received from GDB.
//!
//! A request is identified by the first character of the packet payload; the rest of
//! the payload carries comma, colon or semicolon separated hex fields.

use super::packet::{decode_bytes, hex_to_text, parse_hex};

/// Breakpoint and watchpoint types of `z`/`Z` packets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BreakpointKind {
    /// Software breakpoint (type 0).
    Software,
    /// Hardware breakpoint (type 1).
    Hardware,
    /// Write watchpoint (type 2).
    WriteWatch,
    /// Read watchpoint (type 3).
    ReadWatch,
    /// Access watchpoint (type 4).
    AccessWatch,
}

impl BreakpointKind {
    /// Maps a packet type number to a kind.
    pub const fn from_type(kind: u32) -> Option<Self> {
        match kind {
            0 => Some(Self::Software),
            1 => Some(Self::Hardware),
            2 => Some(Self::WriteWatch),
            3 => Some(Self::ReadWatch),
            4 => Some(Self::AccessWatch),
            _ => None,
        }
    }
}

/// A decoded GDB request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GdbRequest {
    /// `!`: enable extended mode.
    ExtendedMode,
    /// `?`: why the target stopped.
    StopReason,
    /// `c [addr]`: continue, optionally from `addr`.
    Continue {
        /// Resume address.
        addr: Option<u32>,
    },
    /// `C sig[;addr]`: continue with a signal.
    ContinueSignal {
        /// Signal number.
        signal: u32,
        /// Resume address.
        addr: Option<u32>,
    },
    /// `D`: detach.
    Detach,
    /// `g`: read all registers.
    ReadRegisters,
    /// `G data`: write all registers.
    WriteRegisters {
        /// Register bytes in target order.
        data: Vec<u8>,
    },
    /// `H op thread`: select a thread for later operations.
    SetThread {
        /// Operation the thread applies to (`c`, `g`).
        op: char,
        /// Thread id; `-1` means all threads.
        thread: i64,
    },
    /// `i [addr[,count]]`: cycle step.
    CycleStep {
        /// Resume address.
        addr: Option<u32>,
        /// Number of cycles.
        count: u32,
    },
    /// `I`: cycle step with a signal.
    SignalCycleStep,
    /// `k`: kill the target.
    Kill,
    /// `m addr,len`: read memory.
    ReadMemory {
        /// First address.
        addr: u32,
        /// Number of bytes.
        len: u32,
    },
    /// `M addr,len:data`: write memory.
    WriteMemory {
        /// First address.
        addr: u32,
        /// Number of bytes announced.
        len: u32,
        /// Bytes to write.
        data: Vec<u8>,
    },
    /// `p reg`: read one register.
    ReadRegister {
        /// GDB register number.
        reg: u32,
    },
    /// `P reg=value`: write one register.
    WriteRegister {
        /// GDB register number.
        reg: u32,
        /// Value in target byte order as sent.
        value: u32,
    },
    /// `q command,args`: general query.
    Query {
        /// Query name (e.g. `Rcmd`).
        command: String,
        /// Decoded argument text.
        extension: String,
    },
    /// `s [addr]`: single step, optionally from `addr`.
    Step {
        /// Resume address.
        addr: Option<u32>,
    },
    /// `S sig[;addr]`: single step with a signal.
    StepSignal {
        /// Signal number.
        signal: u32,
        /// Resume address.
        addr: Option<u32>,
    },
    /// `t addr:PP,MM`: backward search.
    Search {
        /// Start address.
        addr: u32,
        /// Pattern.
        pattern: u32,
        /// Mask.
        mask: u32,
    },
    /// `T thread`: is the thread alive.
    ThreadAlive {
        /// Thread id.
        thread: u32,
    },
    /// `v...`: multi-letter command such as `vCont`.
    Verbose {
        /// Command text after the `v`.
        command: String,
    },
    /// `z type,addr,len`: remove a break/watchpoint.
    RemoveBreakpoint {
        /// Packet type number (0-4 are defined).
        kind: u32,
        /// Address.
        addr: u32,
        /// Length or breakpoint kind.
        len: u32,
    },
    /// `Z type,addr,len`: insert a break/watchpoint.
    InsertBreakpoint {
        /// Packet type number (0-4 are defined).
        kind: u32,
        /// Address.
        addr: u32,
        /// Length or breakpoint kind.
        len: u32,
    },
    /// The client interrupted the running target.
    Interrupt,
    /// Anything not understood; answered with an empty packet.
    Unknown,
    /// The connection failed while reading the request.
    Error,
}

impl GdbRequest {
    /// Decodes a payload whose checksum has already been verified.
    ///
    /// Malformed numeric fields are logged and turn the request into
    /// [`GdbRequest::Unknown`].
    pub fn parse(payload: &str) -> Self {
        let Some(kind) = payload.chars().next() else {
            return Self::Unknown;
        };
        let args = &payload[kind.len_utf8()..];
        let parsed = match kind {
            '!' => Some(Self::ExtendedMode),
            '?' => Some(Self::StopReason),
            'c' => optional_hex(args).map(|addr| Self::Continue { addr }),
            'C' => signal_and_address(args)
                .map(|(signal, addr)| Self::ContinueSignal { signal, addr }),
            'D' => Some(Self::Detach),
            'g' => Some(Self::ReadRegisters),
            'G' => decode_bytes(args).map(|data| Self::WriteRegisters { data }),
            'H' => parse_set_thread(args),
            'i' => parse_cycle_step(args),
            'I' => Some(Self::SignalCycleStep),
            'k' => Some(Self::Kill),
            'm' => args.split_once(',').and_then(|(addr, len)| {
                Some(Self::ReadMemory {
                    addr: parse_hex(addr)?,
                    len: parse_hex(len)?,
                })
            }),
            'M' => parse_write_memory(args),
            'p' => parse_hex(args).map(|reg| Self::ReadRegister { reg }),
            'P' => parse_write_register(args),
            'q' => Some(match args.split_once(',') {
                Some((command, extension)) => Self::Query {
                    command: command.to_string(),
                    extension: hex_to_text(extension),
                },
                None => Self::Unknown,
            }),
            's' => optional_hex(args).map(|addr| Self::Step { addr }),
            'S' => signal_and_address(args)
                .map(|(signal, addr)| Self::StepSignal { signal, addr }),
            't' => parse_search(args),
            'T' => parse_hex(args).map(|thread| Self::ThreadAlive { thread }),
            'v' => Some(Self::Verbose {
                command: args.to_string(),
            }),
            'z' | 'Z' => parse_breakpoint(args).map(|(bp_kind, addr, len)| {
                if kind == 'z' {
                    Self::RemoveBreakpoint {
                        kind: bp_kind,
                        addr,
                        len,
                    }
                } else {
                    Self::InsertBreakpoint {
                        kind: bp_kind,
                        addr,
                        len,
                    }
                }
            }),
            _ => Some(Self::Unknown),
        };
        parsed.unwrap_or_else(|| {
            tracing::warn!(payload, "malformed GDB request");
            Self::Unknown
        })
    }
}

/// An optional hex address: `Some(None)` when absent, `None` when malformed.
fn optional_hex(text: &str) -> Option<Option<u32>> {
    if text.is_empty() {
        Some(None)
    } else {
        parse_hex(text).map(Some)
    }
}

fn signal_and_address(text: &str) -> Option<(u32, Option<u32>)> {
    match text.split_once(';') {
        Some((signal, addr)) => Some((parse_hex(signal)?, Some(parse_hex(addr)?))),
        None => Some((parse_hex(text)?, None)),
    }
}

fn parse_set_thread(text: &str) -> Option<GdbRequest> {
    let mut chars = text.chars();
    let op = chars.next()?;
    let id = chars.as_str();
    let thread = if id == "-1" {
        -1
    } else {
        i64::from(parse_hex(id)?)
    };
    Some(GdbRequest::SetThread { op, thread })
}

fn parse_cycle_step(text: &str) -> Option<GdbRequest> {
    if text.is_empty() {
        return Some(GdbRequest::CycleStep {
            addr: None,
            count: 1,
        });
    }
    match text.split_once(',') {
        Some((addr, count)) => Some(GdbRequest::CycleStep {
            addr: Some(parse_hex(addr)?),
            count: parse_hex(count)?,
        }),
        None => Some(GdbRequest::CycleStep {
            addr: Some(parse_hex(text)?),
            count: 1,
        }),
    }
}

fn parse_write_memory(text: &str) -> Option<GdbRequest> {
    let (range, data) = text.split_once(':')?;
    let (addr, len) = range.split_once(',')?;
    let addr = parse_hex(addr)?;
    let len = parse_hex(len)?;
    let data = decode_bytes(data)?;
    if data.len() != len as usize {
        tracing::warn!(
            announced = len,
            received = data.len(),
            "M packet length does not match its data"
        );
    }
    Some(GdbRequest::WriteMemory { addr, len, data })
}

fn parse_write_register(text: &str) -> Option<GdbRequest> {
    let (reg, value) = text.split_once('=').unwrap_or_else(|| {
        tracing::warn!(text, "P packet without a value");
        (text, "")
    });
    Some(GdbRequest::WriteRegister {
        reg: parse_hex(reg)?,
        value: parse_hex(value)?,
    })
}

fn parse_search(text: &str) -> Option<GdbRequest> {
    let (addr, rest) = text.split_once(':')?;
    let (pattern, mask) = rest.split_once(',')?;
    Some(GdbRequest::Search {
        addr: parse_hex(addr)?,
        pattern: parse_hex(pattern)?,
        mask: parse_hex(mask)?,
    })
}

fn parse_breakpoint(text: &str) -> Option<(u32, u32, u32)> {
    let (kind, rest) = text.split_once(',')?;
    let (addr, len) = rest.rsplit_once(',')?;
    Some((parse_hex(kind)?, parse_hex(addr)?, parse_hex(len)?))
}
