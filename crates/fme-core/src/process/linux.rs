//! Linux probe: `/proc` enumeration and `process_vm_{readv,writev}`.

use std::fs;
use std::io::{BufRead, BufReader};

use tracing::debug;

use super::{NameSelector, ProcessProbe};
use crate::memory::Region;

#[derive(Debug)]
pub struct PlatformProbe {
    pid: i32,
}

impl PlatformProbe {
    pub fn new() -> Self {
        Self { pid: -1 }
    }

    /// Short name of a process, from `/proc/<pid>/comm` (trailing
    /// newline stripped).
    fn comm(pid: i32) -> Option<String> {
        let raw = fs::read_to_string(format!("/proc/{pid}/comm")).ok()?;
        Some(raw.trim_end_matches('\n').to_string())
    }
}

/// Parse one `/proc/<pid>/maps` line into a region, keeping only `rw`
/// entries. Format: `start-end perms offset dev inode [pathname]`.
fn parse_maps_line(line: &str) -> Option<Region> {
    let mut fields = line.split_whitespace();
    let addresses = fields.next()?;
    let perms = fields.next()?;

    if !perms.starts_with("rw") {
        return None;
    }

    let (start, end) = addresses.split_once('-')?;
    let start = u64::from_str_radix(start, 16).ok()?;
    let end = u64::from_str_radix(end, 16).ok()?;
    if end <= start {
        return None;
    }

    Some(Region::new(start, end - start))
}

impl ProcessProbe for PlatformProbe {
    fn find_process(&mut self, selector: &NameSelector) -> Option<i32> {
        self.pid = -1;

        for entry in fs::read_dir("/proc").ok()? {
            let Ok(entry) = entry else { continue };
            let Ok(pid) = entry.file_name().to_string_lossy().parse::<i32>() else {
                continue;
            };
            let Some(name) = Self::comm(pid) else { continue };

            if selector.matches(&name) {
                debug!("Matched emulator process {:?} (pid {})", name, pid);
                self.pid = pid;
                return Some(pid);
            }
        }

        None
    }

    fn enumerate_regions(&mut self) -> Option<Vec<Region>> {
        if self.pid <= 0 {
            return None;
        }

        let maps = fs::File::open(format!("/proc/{}/maps", self.pid)).ok()?;
        let regions: Vec<Region> = BufReader::new(maps)
            .lines()
            .map_while(|line| line.ok())
            .filter_map(|line| parse_maps_line(&line))
            .collect();

        if regions.is_empty() { None } else { Some(regions) }
    }

    fn read_at(&self, host_addr: u64, buffer: &mut [u8]) -> bool {
        if self.pid <= 0 || buffer.is_empty() {
            return false;
        }

        let local = libc::iovec {
            iov_base: buffer.as_mut_ptr().cast(),
            iov_len: buffer.len(),
        };
        let remote = libc::iovec {
            iov_base: host_addr as *mut libc::c_void,
            iov_len: buffer.len(),
        };

        // SAFETY: both iovecs describe valid, correctly sized buffers;
        // the remote side is validated by the kernel.
        let nread = unsafe { libc::process_vm_readv(self.pid, &local, 1, &remote, 1, 0) };
        nread == buffer.len() as isize
    }

    fn write_at(&self, host_addr: u64, buffer: &[u8]) -> bool {
        if self.pid <= 0 || buffer.is_empty() {
            return false;
        }

        let local = libc::iovec {
            iov_base: buffer.as_ptr() as *mut libc::c_void,
            iov_len: buffer.len(),
        };
        let remote = libc::iovec {
            iov_base: host_addr as *mut libc::c_void,
            iov_len: buffer.len(),
        };

        // SAFETY: as in read_at; the local buffer is only read from.
        let nwrote = unsafe { libc::process_vm_writev(self.pid, &local, 1, &remote, 1, 0) };
        nwrote == buffer.len() as isize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_line_keeps_rw_entries() {
        let line = "55c40b9e5000-55c40bc0a000 rw-p 00000000 00:00 0   [heap]";
        let region = parse_maps_line(line).unwrap();
        assert_eq!(region.base, 0x55c40b9e5000);
        assert_eq!(region.size, 0x55c40bc0a000 - 0x55c40b9e5000);
    }

    #[test]
    fn maps_line_drops_non_writable_entries() {
        assert!(parse_maps_line("7f0000000000-7f0000001000 r-xp 00000000 08:01 123 /usr/bin/x").is_none());
        assert!(parse_maps_line("7f0000000000-7f0000001000 ---p 00000000 00:00 0").is_none());
    }

    #[test]
    fn maps_line_rejects_malformed_input() {
        assert!(parse_maps_line("").is_none());
        assert!(parse_maps_line("not-an-address rw-p").is_none());
        assert!(parse_maps_line("2000-1000 rw-p 00000000 00:00 0").is_none());
    }

    #[test]
    fn shared_rw_mappings_are_eligible() {
        let line = "7f1200000000-7f1210000000 rw-s 00000000 00:05 42 /memfd:flycast (deleted)";
        assert!(parse_maps_line(line).is_some());
    }
}
