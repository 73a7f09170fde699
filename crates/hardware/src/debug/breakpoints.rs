//! Breakpoint and watchpoint bookkeeping.
//!
//! Breakpoints are keyed by instruction address. Watchpoints are stored once per
//! watched byte so that an access of any width can be matched with a few lookups.

use std::collections::HashMap;

use super::request::BreakpointKind;
use crate::common::data::{AccessType, DataAccess};

/// A breakpoint set by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Breakpoint {
    /// Instruction address.
    pub addr: u32,
    /// Software or hardware.
    pub kind: BreakpointKind,
    /// Length field of the `Z` packet.
    pub len: u32,
}

/// Breakpoints indexed by address.
#[derive(Clone, Debug, Default)]
pub struct BreakpointManager {
    breakpoints: HashMap<u32, Breakpoint>,
}

impl BreakpointManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a breakpoint.
    ///
    /// # Returns
    ///
    /// `false` if a breakpoint already exists at `addr`.
    pub fn add(&mut self, kind: BreakpointKind, addr: u32, len: u32) -> bool {
        if self.breakpoints.contains_key(&addr) {
            return false;
        }
        let _ = self.breakpoints.insert(addr, Breakpoint { addr, kind, len });
        true
    }

    /// Removes the breakpoint at `addr`; returns whether there was one.
    pub fn remove(&mut self, addr: u32) -> bool {
        self.breakpoints.remove(&addr).is_some()
    }

    /// Breakpoint at `addr`, if any.
    pub fn get(&self, addr: u32) -> Option<&Breakpoint> {
        self.breakpoints.get(&addr)
    }

    /// Returns `true` if a breakpoint is set at `addr`.
    pub fn contains(&self, addr: u32) -> bool {
        self.breakpoints.contains_key(&addr)
    }

    /// Number of breakpoints.
    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    /// Returns `true` if no breakpoint is set.
    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    /// Removes every breakpoint.
    pub fn clear(&mut self) {
        self.breakpoints.clear();
    }
}

/// Accesses a watchpoint reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WatchKind {
    /// Stores.
    Write,
    /// Loads.
    Read,
    /// Loads and stores.
    Access,
}

impl WatchKind {
    /// Key used in the `T` stop reply.
    pub const fn stop_key(self) -> &'static str {
        match self {
            Self::Write => "watch",
            Self::Read => "rwatch",
            Self::Access => "awatch",
        }
    }

    /// Returns `true` if an access of `kind` triggers this watchpoint.
    pub const fn matches(self, kind: AccessType) -> bool {
        matches!(
            (self, kind),
            (Self::Write | Self::Access, AccessType::Write)
                | (Self::Read | Self::Access, AccessType::Read)
        )
    }
}

impl TryFrom<BreakpointKind> for WatchKind {
    type Error = BreakpointKind;

    fn try_from(kind: BreakpointKind) -> Result<Self, Self::Error> {
        match kind {
            BreakpointKind::WriteWatch => Ok(Self::Write),
            BreakpointKind::ReadWatch => Ok(Self::Read),
            BreakpointKind::AccessWatch => Ok(Self::Access),
            other => Err(other),
        }
    }
}

/// A watched address range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Watchpoint {
    /// First watched byte.
    pub addr: u32,
    /// Number of watched bytes.
    pub len: u32,
    /// Accesses that trigger it.
    pub kind: WatchKind,
}

/// Watchpoints indexed by watched byte.
#[derive(Clone, Debug, Default)]
pub struct WatchpointManager {
    bytes: HashMap<u32, Watchpoint>,
}

impl WatchpointManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    fn range(addr: u32, len: u32) -> impl Iterator<Item = u32> {
        (0..len.max(1)).map(move |i| addr.wrapping_add(i))
    }

    /// Watches `[addr, addr + len)`.
    ///
    /// # Returns
    ///
    /// `false` if any byte of the range is already watched.
    pub fn add(&mut self, kind: WatchKind, addr: u32, len: u32) -> bool {
        if Self::range(addr, len).any(|byte| self.bytes.contains_key(&byte)) {
            return false;
        }
        let watchpoint = Watchpoint { addr, len, kind };
        for byte in Self::range(addr, len) {
            let _ = self.bytes.insert(byte, watchpoint);
        }
        true
    }

    /// Stops watching `[addr, addr + len)`; returns whether anything was watched.
    pub fn remove(&mut self, addr: u32, len: u32) -> bool {
        let mut removed = false;
        for byte in Self::range(addr, len) {
            removed |= self.bytes.remove(&byte).is_some();
        }
        removed
    }

    /// Returns `true` if `addr` is watched.
    pub fn is_watched(&self, addr: u32) -> bool {
        self.bytes.contains_key(&addr)
    }

    /// The watchpoint triggered by `access`, if any.
    pub fn hit(&self, access: &DataAccess) -> Option<Watchpoint> {
        Self::range(access.addr, access.size)
            .filter_map(|byte| self.bytes.get(&byte))
            .find(|wp| wp.kind.matches(access.kind))
            .copied()
    }

    /// Returns `true` if nothing is watched.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Removes every watchpoint.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}
