//! Cross-process access to the emulator.
//!
//! Each platform implements the same small capability set: find the
//! emulator process by name, snapshot its committed read-write
//! mappings, and transfer byte ranges across the process boundary.
//! Handles and ports acquired along the way are released on drop, so
//! teardown is guaranteed on every exit path.

mod name;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::PlatformProbe;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
pub use macos::PlatformProbe;

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
pub use windows::PlatformProbe;

#[cfg(test)]
pub mod mock;

pub use name::{NameSelector, PROCESS_NAME_ENV};

use crate::memory::Region;

/// Capability set shared by the per-OS probes.
///
/// `read_at`/`write_at` move exactly `buffer.len()` bytes in a single
/// syscall; a short transfer is a failure. OS error codes stay behind
/// this boundary.
pub trait ProcessProbe {
    /// Enumerate processes and return the first whose short name the
    /// selector accepts.
    fn find_process(&mut self, selector: &NameSelector) -> Option<i32>;

    /// Snapshot every committed, readable and writable mapping of the
    /// target. A fresh call produces a fresh snapshot.
    fn enumerate_regions(&mut self) -> Option<Vec<Region>>;

    /// Read `buffer.len()` bytes at a host virtual address.
    fn read_at(&self, host_addr: u64, buffer: &mut [u8]) -> bool;

    /// Write `buffer.len()` bytes at a host virtual address.
    fn write_at(&self, host_addr: u64, buffer: &[u8]) -> bool;
}
