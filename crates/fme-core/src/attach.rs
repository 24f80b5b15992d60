//! Attachment lifecycle: find the emulator, locate the arena, verify
//! it, and hold the probe for steady-state transfers.

use tracing::{debug, warn};

use crate::arena::triangulate;
use crate::error::{Error, Result};
use crate::memory::layout::{OFF_AICA, OFF_MAIN, PROBE_SIZE};
use crate::process::{NameSelector, ProcessProbe};

/// Attachment status, the only error surface most consumers need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No matching emulator process.
    NotRunning,
    /// Process found, but the arena was not located or the probe read
    /// failed.
    NoEmu,
    /// Arena located and verified; transfers are live.
    Hooked,
    /// Torn down by `unhook`.
    Unhooked,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotRunning => "not-running",
            Status::NoEmu => "no-emu",
            Status::Hooked => "hooked",
            Status::Unhooked => "unhooked",
        }
    }
}

/// Live attachment to an emulator process.
///
/// Created detached; `hook` drives it through
/// `find process → enumerate regions → triangulate → probe read`, and
/// `unhook` (or drop) releases every OS resource. Not internally
/// synchronized: callers mixing `hook`/`unhook` with transfers across
/// threads must serialize externally.
pub struct Attachment<P: ProcessProbe> {
    probe: Option<P>,
    status: Status,
    pid: i32,
    main_ram_host_addr: u64,
    aram_host_addr: u64,
    aram_accessible: bool,
}

impl<P: ProcessProbe> Default for Attachment<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ProcessProbe> Attachment<P> {
    pub fn new() -> Self {
        Self {
            probe: None,
            status: Status::NotRunning,
            pid: -1,
            main_ram_host_addr: 0,
            aram_host_addr: 0,
            aram_accessible: false,
        }
    }

    /// Hook using the process name selection from the environment.
    ///
    /// Re-entrant: any prior probe is torn down first, so restarting
    /// the emulator between calls never leaks a handle.
    pub fn hook_with(&mut self, probe: P) {
        self.hook_with_selector(probe, &NameSelector::from_env());
    }

    /// Hook with an explicit process name selector.
    pub fn hook_with_selector(&mut self, mut probe: P, selector: &NameSelector) {
        self.teardown(Status::NotRunning);

        match self.locate(&mut probe, selector) {
            Ok(()) => {
                self.probe = Some(probe);
                self.status = Status::Hooked;
                debug!(
                    "Hooked pid {} (RAM {:#x}, ARAM {:#x})",
                    self.pid, self.main_ram_host_addr, self.aram_host_addr
                );
            }
            Err(Error::ProcessNotFound) => {
                self.status = Status::NotRunning;
            }
            Err(e) => {
                warn!("Hook failed after finding pid {}: {}", self.pid, e);
                self.main_ram_host_addr = 0;
                self.aram_host_addr = 0;
                self.aram_accessible = false;
                self.status = Status::NoEmu;
            }
        }
    }

    fn locate(&mut self, probe: &mut P, selector: &NameSelector) -> Result<()> {
        self.pid = probe.find_process(selector).ok_or(Error::ProcessNotFound)?;

        let regions = probe.enumerate_regions().ok_or(Error::EnumerationFailed)?;
        debug!("Snapshot: {} committed rw regions", regions.len());

        let arena_base = triangulate(&regions).ok_or(Error::ArenaNotFound)?;

        self.main_ram_host_addr = arena_base + OFF_MAIN;
        self.aram_host_addr = arena_base + OFF_AICA;
        // Optimistic: a located arena is assumed to carry a usable
        // AICA window even when no region voted for it.
        self.aram_accessible = true;

        // Final acceptance test before declaring the attachment live.
        let mut probe_buf = [0u8; PROBE_SIZE];
        if !probe.read_at(self.main_ram_host_addr, &mut probe_buf) {
            return Err(Error::ProbeFailed);
        }

        Ok(())
    }

    /// Tear down and release the probe.
    pub fn unhook(&mut self) {
        self.teardown(Status::Unhooked);
    }

    fn teardown(&mut self, status: Status) {
        self.probe = None;
        self.status = status;
        self.pid = -1;
        self.main_ram_host_addr = 0;
        self.aram_host_addr = 0;
        self.aram_accessible = false;
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// PID of the hooked process, or −1.
    pub fn pid(&self) -> i32 {
        self.pid
    }

    pub fn ram_start(&self) -> u64 {
        self.main_ram_host_addr
    }

    pub fn aram_start(&self) -> u64 {
        self.aram_host_addr
    }

    pub fn aram_accessible(&self) -> bool {
        self.aram_accessible
    }

    /// Read `buffer.len()` bytes at a guest RAM offset. Fails without
    /// touching the OS unless hooked; a transfer failure leaves the
    /// status untouched, since the emulator may merely be paused or
    /// remapping and recovery policy belongs to the caller.
    pub fn read(&self, offset: u32, buffer: &mut [u8]) -> Result<()> {
        let probe = self.live_probe()?;
        if probe.read_at(self.main_ram_host_addr + offset as u64, buffer) {
            Ok(())
        } else {
            Err(Error::TransferFailed {
                offset,
                len: buffer.len(),
            })
        }
    }

    /// Write `buffer.len()` bytes at a guest RAM offset. Same gating
    /// and failure semantics as `read`.
    pub fn write(&self, offset: u32, buffer: &[u8]) -> Result<()> {
        let probe = self.live_probe()?;
        if probe.write_at(self.main_ram_host_addr + offset as u64, buffer) {
            Ok(())
        } else {
            Err(Error::TransferFailed {
                offset,
                len: buffer.len(),
            })
        }
    }

    fn live_probe(&self) -> Result<&P> {
        match (self.status, &self.probe) {
            (Status::Hooked, Some(probe)) => Ok(probe),
            _ => Err(Error::NotHooked),
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
impl Attachment<crate::process::PlatformProbe> {
    /// Hook the live platform probe.
    pub fn hook(&mut self) {
        self.hook_with(crate::process::PlatformProbe::new());
    }
}
