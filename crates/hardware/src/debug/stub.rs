//! GDB stub: the debugger driver loop.
//!
//! The stub owns the connection and the break/watchpoint tables and drives a
//! [`Simulator`]. While the target is stopped it serves requests; a continue or step
//! request resumes the instruction loop until one of the following stops it again:
//! 1. **Step:** One instruction was executed in step mode.
//! 2. **Breakpoint:** The next PC carries a breakpoint.
//! 3. **Watchpoint:** The last data access touched a watched byte of a matching kind.
//! 4. **Interrupt:** The client sent Ctrl-C.
//! 5. **Fault:** The simulator hit a fatal error; it is reported as `SIGILL`.
//! 6. **Limit:** The configured instruction limit was reached; it is reported as `SIGXCPU`.
//! 7. **Exit:** The program exited; the client gets a console message and `W<code>`.
//!
//! If the connection is lost or the client detaches, the program runs on without the
//! debugger.

use super::GdbError;
use super::breakpoints::{BreakpointManager, WatchKind, Watchpoint, WatchpointManager};
use super::connection::GdbConnection;
use super::request::{BreakpointKind, GdbRequest};
use super::response::GdbResponse;
use crate::common::data::Asi;
use crate::common::error::SimError;
use crate::core::Cpu;
use crate::core::arch::psr::{PSR_IMPL_VER, PSR_WRITE_MASK, Psr};
use crate::sim::{RunOutcome, Simulator};

/// Illegal instruction; reported when the simulator faults.
pub const SIGILL: u8 = 4;
/// Trace trap; reported for steps, breakpoints, watchpoints and interrupts.
pub const SIGTRAP: u8 = 5;
/// CPU limit exceeded; reported once the instruction limit is reached.
pub const SIGXCPU: u8 = 24;

/// Number of registers in the SPARC GDB register map.
pub const NUM_GDB_REGS: u32 = 72;

/// GDB register numbers of the special registers.
pub mod regnum {
    /// `%y`.
    pub const Y: u32 = 64;
    /// `%psr`.
    pub const PSR: u32 = 65;
    /// `%wim`.
    pub const WIM: u32 = 66;
    /// `%tbr`.
    pub const TBR: u32 = 67;
    /// `%pc`.
    pub const PC: u32 = 68;
    /// `%npc`.
    pub const NPC: u32 = 69;
    /// `%fsr`; reads as zero.
    pub const FSR: u32 = 70;
    /// `%csr`; reads as zero.
    pub const CSR: u32 = 71;
}

/// Instructions executed between two checks for a Ctrl-C from the client.
const INTERRUPT_POLL_INTERVAL: u64 = 1024;

/// Largest memory read served in one reply; longer reads answer `E01`.
pub const MAX_MEMORY_READ: u32 = 0x1000;

const HELP_TEXT: &str = "Custom monitor commands:\n\
    \x20  monitor help:       prints this message\n\
    \x20  monitor time:       returns the current simulation time\n\
    \x20  monitor status:     returns the status of the simulation\n";

/// Why the target last stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// One instruction was executed in step mode.
    Step,
    /// The PC reached a breakpoint.
    Breakpoint(u32),
    /// A data access triggered a watchpoint.
    Watchpoint(Watchpoint),
    /// The client interrupted execution.
    Interrupt,
    /// The simulator hit a fatal error.
    Fault,
    /// The configured instruction limit was reached.
    InstructionLimit,
    /// The program exited.
    Exited(u32),
}

impl StopReason {
    /// The stop reply GDB expects for this reason.
    pub fn reply(self) -> GdbResponse {
        match self {
            Self::Step | Self::Breakpoint(_) | Self::Interrupt => GdbResponse::Signal(SIGTRAP),
            Self::Watchpoint(wp) => GdbResponse::Stop {
                signal: SIGTRAP,
                info: vec![(wp.kind.stop_key().to_string(), wp.addr)],
                size: 4,
            },
            Self::Fault => GdbResponse::Signal(SIGILL),
            Self::InstructionLimit => GdbResponse::Signal(SIGXCPU),
            Self::Exited(code) => GdbResponse::Exited(code as u8),
        }
    }
}

/// How execution resumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resume {
    Continue,
    Step,
}

/// What the request loop decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Resume(Resume),
    Detach,
    Kill,
}

/// Reads a register by GDB number; unknown and floating-point registers read as zero.
pub fn read_register(cpu: &Cpu, reg: u32) -> u32 {
    match reg {
        0..=31 => cpu.regs.read(reg as usize),
        regnum::Y => cpu.y,
        regnum::PSR => cpu.psr.0,
        regnum::WIM => cpu.wim,
        regnum::TBR => cpu.tbr,
        regnum::PC => cpu.pc,
        regnum::NPC => cpu.npc,
        _ => 0,
    }
}

/// Writes a register by GDB number.
///
/// Floating-point registers, FSR and CSR accept and drop the value.
///
/// # Returns
///
/// `false` for a register number outside the map or a PSR whose CWP names no window.
pub fn write_register(cpu: &mut Cpu, reg: u32, value: u32) -> bool {
    match reg {
        0..=31 => cpu.regs.write(reg as usize, value),
        regnum::Y => cpu.y = value,
        regnum::PSR => {
            let psr = Psr((value & PSR_WRITE_MASK) | PSR_IMPL_VER);
            if psr.cwp() >= cpu.num_windows() {
                return false;
            }
            cpu.psr = psr;
            cpu.regs.bind_window(psr.cwp());
        }
        regnum::WIM => cpu.wim = value & cpu.wim_mask(),
        regnum::TBR => cpu.tbr = value,
        regnum::PC => cpu.pc = value,
        regnum::NPC => cpu.npc = value,
        32..=63 | regnum::FSR | regnum::CSR => {}
        _ => return false,
    }
    true
}

/// Debugger driver loop over one GDB connection.
#[derive(Debug)]
pub struct GdbStub {
    connection: GdbConnection,
    breakpoints: BreakpointManager,
    watchpoints: WatchpointManager,
    stop: StopReason,
}

impl GdbStub {
    /// Creates a stub over an established connection.
    pub fn new(connection: GdbConnection) -> Self {
        Self {
            connection,
            breakpoints: BreakpointManager::new(),
            watchpoints: WatchpointManager::new(),
            stop: StopReason::Interrupt,
        }
    }

    /// Waits for a client on `port`.
    ///
    /// # Errors
    ///
    /// `GdbError::Bind` if the connection cannot be established.
    pub fn listen(port: u16, same_endianness: bool) -> Result<Self, GdbError> {
        GdbConnection::initialize(port, same_endianness).map(Self::new)
    }

    /// Breakpoints currently set.
    pub const fn breakpoints(&self) -> &BreakpointManager {
        &self.breakpoints
    }

    /// Watchpoints currently set.
    pub const fn watchpoints(&self) -> &WatchpointManager {
        &self.watchpoints
    }

    /// Reason of the last stop.
    pub const fn stop_reason(&self) -> StopReason {
        self.stop
    }

    /// Runs the simulation under debugger control.
    ///
    /// The target starts stopped and waits for the client's first resume request.
    ///
    /// # Errors
    ///
    /// Fatal simulation errors after the client has detached; while attached they are
    /// reported to the client instead.
    pub fn run(&mut self, sim: &mut Simulator) -> Result<RunOutcome, SimError> {
        loop {
            match self.serve(sim) {
                Action::Resume(mode) => match self.resume(sim, mode) {
                    Some(StopReason::Exited(code)) => {
                        self.stop = StopReason::Exited(code);
                        self.signal_program_end(code);
                        return Ok(RunOutcome::Exited(code));
                    }
                    Some(stop) => {
                        self.stop = stop;
                        if self.send(&stop.reply()).is_err() {
                            return self.run_detached(sim);
                        }
                    }
                    None => return self.run_detached(sim),
                },
                Action::Detach => return self.run_detached(sim),
                Action::Kill => {
                    tracing::info!("killing the program according to GDB request");
                    self.connection.disconnect();
                    return Ok(RunOutcome::Killed);
                }
            }
        }
    }

    fn run_detached(&mut self, sim: &mut Simulator) -> Result<RunOutcome, SimError> {
        tracing::info!("GDB detached; resuming free-running simulation");
        self.breakpoints.clear();
        self.watchpoints.clear();
        self.connection.disconnect();
        sim.run()
    }

    fn send(&mut self, response: &GdbResponse) -> Result<(), GdbError> {
        self.connection.send_response(response).inspect_err(|err| {
            tracing::warn!(%err, "cannot send GDB response");
        })
    }

    /// Serves requests until one resumes, detaches or kills the target.
    fn serve(&mut self, sim: &mut Simulator) -> Action {
        loop {
            let request = self.connection.process_request();
            match self.handle(sim, request) {
                Ok(Some(action)) => return action,
                Ok(None) => {}
                Err(_) => return Action::Detach,
            }
        }
    }

    /// Handles one request; `None` keeps the target stopped.
    fn handle(
        &mut self,
        sim: &mut Simulator,
        request: GdbRequest,
    ) -> Result<Option<Action>, GdbError> {
        let response = match request {
            GdbRequest::StopReason => self.stop.reply(),
            GdbRequest::Continue { addr } | GdbRequest::ContinueSignal { addr, .. } => {
                if let Some(addr) = addr {
                    sim.cpu.jump_to(addr);
                }
                return Ok(Some(Action::Resume(Resume::Continue)));
            }
            GdbRequest::Step { addr } | GdbRequest::StepSignal { addr, .. } => {
                if let Some(addr) = addr {
                    sim.cpu.jump_to(addr);
                }
                return Ok(Some(Action::Resume(Resume::Step)));
            }
            GdbRequest::Detach => {
                self.breakpoints.clear();
                self.watchpoints.clear();
                self.send(&GdbResponse::Ok)?;
                return Ok(Some(Action::Detach));
            }
            GdbRequest::Kill => return Ok(Some(Action::Kill)),
            GdbRequest::Error => return Ok(Some(Action::Detach)),
            GdbRequest::Interrupt => {
                self.stop = StopReason::Interrupt;
                self.stop.reply()
            }
            GdbRequest::ReadRegisters => {
                let data = (0..NUM_GDB_REGS)
                    .flat_map(|reg| read_register(&sim.cpu, reg).to_be_bytes())
                    .collect();
                GdbResponse::Registers(data)
            }
            GdbRequest::WriteRegisters { data } => Self::write_registers(&mut sim.cpu, &data),
            GdbRequest::ReadRegister { reg } => {
                GdbResponse::Registers(read_register(&sim.cpu, reg).to_be_bytes().to_vec())
            }
            GdbRequest::WriteRegister { reg, value } => {
                if write_register(&mut sim.cpu, reg, value) {
                    GdbResponse::Ok
                } else {
                    GdbResponse::Error(0)
                }
            }
            GdbRequest::ReadMemory { addr, len } => Self::read_memory(&mut sim.cpu, addr, len),
            GdbRequest::WriteMemory { addr, len, data } => {
                Self::write_memory(&mut sim.cpu, addr, len, &data)
            }
            GdbRequest::InsertBreakpoint { kind, addr, len } => self.insert(kind, addr, len),
            GdbRequest::RemoveBreakpoint { addr, len, .. } => {
                if self.breakpoints.remove(addr) || self.watchpoints.remove(addr, len) {
                    GdbResponse::Ok
                } else {
                    GdbResponse::Error(0)
                }
            }
            GdbRequest::SetThread { .. } | GdbRequest::ThreadAlive { .. } => GdbResponse::Ok,
            GdbRequest::Verbose { command } => match Self::verbose(&command) {
                Ok(Some(mode)) => return Ok(Some(Action::Resume(mode))),
                Ok(None) => GdbResponse::ContActions(vec!['c', 's']),
                Err(response) => response,
            },
            GdbRequest::Query { command, extension } => {
                if command == "Rcmd" {
                    self.monitor(sim, &extension)?
                } else {
                    GdbResponse::NotSupported
                }
            }
            GdbRequest::ExtendedMode
            | GdbRequest::CycleStep { .. }
            | GdbRequest::SignalCycleStep
            | GdbRequest::Search { .. }
            | GdbRequest::Unknown => GdbResponse::NotSupported,
        };
        self.send(&response)?;
        Ok(None)
    }

    fn write_registers(cpu: &mut Cpu, data: &[u8]) -> GdbResponse {
        let mut written = 0;
        let mut failed = false;
        for (reg, chunk) in (0..NUM_GDB_REGS).zip(data.chunks_exact(4)) {
            let value = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            failed |= !write_register(cpu, reg, value);
            written += 1;
        }
        if failed || written != NUM_GDB_REGS {
            GdbResponse::Error(0)
        } else {
            GdbResponse::Ok
        }
    }

    fn read_memory(cpu: &mut Cpu, addr: u32, len: u32) -> GdbResponse {
        if len > MAX_MEMORY_READ {
            tracing::warn!(len, "GDB memory read too long");
            return GdbResponse::Error(1);
        }
        let data = (0..len)
            .map(|i| {
                let byte_addr = addr.wrapping_add(i);
                cpu.memory
                    .read_byte(byte_addr, Asi::SUPERVISOR_DATA)
                    .unwrap_or_else(|err| {
                        tracing::warn!(%err, "GDB memory read failed");
                        0
                    })
            })
            .collect();
        GdbResponse::Memory(data)
    }

    fn write_memory(cpu: &mut Cpu, addr: u32, len: u32, data: &[u8]) -> GdbResponse {
        let mut written = 0u32;
        for byte in data {
            if let Err(err) =
                cpu.memory
                    .write_byte(addr.wrapping_add(written), *byte, Asi::SUPERVISOR_DATA)
            {
                tracing::warn!(%err, "GDB memory write failed");
                return GdbResponse::Error(0);
            }
            written += 1;
        }
        if written == len {
            GdbResponse::Ok
        } else {
            GdbResponse::Error(0)
        }
    }

    fn insert(&mut self, kind: u32, addr: u32, len: u32) -> GdbResponse {
        let added = match BreakpointKind::from_type(kind) {
            Some(bp @ (BreakpointKind::Software | BreakpointKind::Hardware)) => {
                self.breakpoints.add(bp, addr, len)
            }
            Some(bp) => match WatchKind::try_from(bp) {
                Ok(watch) => self.watchpoints.add(watch, addr, len),
                Err(_) => return GdbResponse::NotSupported,
            },
            None => return GdbResponse::NotSupported,
        };
        if added {
            GdbResponse::Ok
        } else {
            GdbResponse::Error(0)
        }
    }

    /// Interprets a `v` command.
    ///
    /// `Ok(None)` answers `vCont?`; `Ok(Some(_))` resumes; `Err` carries the reply for
    /// anything else.
    fn verbose(command: &str) -> Result<Option<Resume>, GdbResponse> {
        let Some(actions) = command.strip_prefix("Cont") else {
            return Err(GdbResponse::NotSupported);
        };
        if actions.ends_with('?') {
            return Ok(None);
        }
        let actions: Vec<&str> = actions.trim_start_matches(';').split(';').collect();
        if actions.len() != 1 {
            return Err(GdbResponse::Error(0));
        }
        match actions[0].chars().next() {
            Some('c') => Ok(Some(Resume::Continue)),
            Some('s') => Ok(Some(Resume::Step)),
            _ => Err(GdbResponse::Error(0)),
        }
    }

    /// Runs a `monitor` command; console output is sent before the final reply.
    fn monitor(&mut self, sim: &Simulator, command: &str) -> Result<GdbResponse, GdbError> {
        let word = command.split_whitespace().next().unwrap_or_default();
        let stats = &sim.cpu.stats;
        match word {
            "help" => self.send(&GdbResponse::Output(HELP_TEXT.to_string()))?,
            "time" => self.send(&GdbResponse::Output(format!(
                "Current simulation time: {} cycles\n",
                stats.cycles
            )))?,
            "status" => self.send(&GdbResponse::Output(format!(
                "Current simulation time: {} cycles\n\
                 Instructions executed: {}\n\
                 PC: {:#010x}  NPC: {:#010x}\n\
                 Breakpoints: {}\n",
                stats.cycles,
                stats.instructions_retired,
                sim.cpu.pc,
                sim.cpu.npc,
                self.breakpoints.len(),
            )))?,
            _ => return Ok(GdbResponse::NotSupported),
        }
        Ok(GdbResponse::Ok)
    }

    /// Executes instructions until the target must stop.
    ///
    /// Returns `None` if the connection was lost while running.
    fn resume(&mut self, sim: &mut Simulator, mode: Resume) -> Option<StopReason> {
        let mut executed = 0u64;
        loop {
            if sim.limit_reached() {
                tracing::info!("instruction limit reached under GDB");
                return Some(StopReason::InstructionLimit);
            }
            if let Err(err) = sim.step() {
                tracing::error!(%err, "simulation fault under GDB");
                return Some(StopReason::Fault);
            }
            executed += 1;

            if let Some(code) = sim.exit_code() {
                return Some(StopReason::Exited(code));
            }
            if let Some(access) = sim.cpu.last_data_access
                && let Some(wp) = self.watchpoints.hit(&access)
            {
                return Some(StopReason::Watchpoint(wp));
            }
            if mode == Resume::Step {
                return Some(StopReason::Step);
            }
            if self.breakpoints.contains(sim.cpu.pc) {
                return Some(StopReason::Breakpoint(sim.cpu.pc));
            }
            if executed % INTERRUPT_POLL_INTERVAL == 0 {
                if self.connection.poll_interrupt() {
                    return Some(StopReason::Interrupt);
                }
                if self.connection.is_killed() {
                    return None;
                }
            }
        }
    }

    /// Tells the client the program ended: a console message, then `W<code>`.
    fn signal_program_end(&mut self, code: u32) {
        let sent = self
            .send(&GdbResponse::Output("\nProgram Correctly Ended\n".to_string()))
            .and_then(|()| self.send(&StopReason::Exited(code).reply()));
        if sent.is_err() {
            self.connection.disconnect();
        }
    }
}
