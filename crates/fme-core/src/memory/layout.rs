//! Guest memory layout constants for Flycast's virtual-memory arena.
//!
//! With virtmem enabled, Flycast reserves one contiguous host arena and
//! places each guest memory window at a fixed offset from the arena
//! base. Those offsets are the only fingerprint used to locate the
//! arena in a live process.

/// VRAM window offset from the arena base.
pub const OFF_VRAM: u64 = 0x0400_0000;

/// Main SH-4 RAM window offset from the arena base.
pub const OFF_MAIN: u64 = 0x0C00_0000;

/// AICA (audio) RAM window offset from the arena base.
pub const OFF_AICA: u64 = 0x2000_0000;

/// Dreamcast main RAM size (16 MiB).
pub const RAM_SIZE: u32 = 16 * 1024 * 1024;

/// Length of the acceptance probe read at the putative RAM base.
///
/// The size is arbitrary; an emulator that un-commits the first 16
/// bytes of RAM would defeat the probe even though the rest of RAM is
/// valid.
pub const PROBE_SIZE: usize = 16;
