//! Simulation session bookkeeping.
//!
//! A session tracks the programs running on the platform. Every program belongs to a
//! group (processors sharing one image form one group); the first registration of a
//! group counts one running program. When a program exits the count drops, and the
//! run loop stops once no program is left.

/// Running-program accounting for one simulation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    group_ids: Vec<u32>,
    programs: usize,
    exit_codes: Vec<u32>,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a program of `group`.
    ///
    /// # Returns
    ///
    /// `true` if the group was new and now counts as a running program.
    pub fn register_program(&mut self, group: u32) -> bool {
        if self.group_ids.contains(&group) {
            return false;
        }
        self.group_ids.push(group);
        self.programs += 1;
        true
    }

    /// Records that a program exited with `code`.
    ///
    /// # Returns
    ///
    /// `true` if it was the last running program and the simulation should stop.
    pub fn program_exited(&mut self, code: u32) -> bool {
        self.exit_codes.push(code);
        self.programs = self.programs.saturating_sub(1);
        tracing::debug!(code, remaining = self.programs, "program exited");
        self.programs == 0
    }

    /// Number of programs still running.
    pub const fn active_programs(&self) -> usize {
        self.programs
    }

    /// Registered group ids, in registration order.
    pub fn groups(&self) -> &[u32] {
        &self.group_ids
    }

    /// Exit codes reported so far, in exit order.
    pub fn exit_codes(&self) -> &[u32] {
        &self.exit_codes
    }

    /// Returns `true` once every registered program has exited.
    pub fn is_finished(&self) -> bool {
        self.programs == 0 && !self.group_ids.is_empty()
    }

    /// Forgets every group and exit code.
    pub fn reset(&mut self) {
        self.group_ids.clear();
        self.exit_codes.clear();
        self.programs = 0;
    }
}
