//! Windows probe: Toolhelp snapshot, `VirtualQueryEx` region walk and
//! `Read/WriteProcessMemory` transfers.

use std::ffi::c_void;

use tracing::debug;
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Diagnostics::Debug::{ReadProcessMemory, WriteProcessMemory};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW,
    TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Memory::{
    MEM_COMMIT, MEM_MAPPED, MEM_PRIVATE, MEMORY_BASIC_INFORMATION, PAGE_GUARD, PAGE_NOACCESS,
    VirtualQueryEx,
};
use windows::Win32::System::ProcessStatus::{
    K32QueryWorkingSetEx, PSAPI_WORKING_SET_EX_INFORMATION,
};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_OPERATION, PROCESS_VM_READ,
    PROCESS_VM_WRITE,
};

use super::{NameSelector, ProcessProbe};
use crate::memory::Region;

/// Process handle that closes itself when the probe goes away.
struct OwnedHandle(HANDLE);

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        // SAFETY: the handle was opened by us and is closed exactly once.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

pub struct PlatformProbe {
    pid: i32,
    handle: Option<OwnedHandle>,
}

impl PlatformProbe {
    pub fn new() -> Self {
        Self {
            pid: -1,
            handle: None,
        }
    }

    fn open(&mut self, pid: u32) -> bool {
        // SAFETY: plain process-open call; failure is reported in the result.
        let handle = unsafe {
            OpenProcess(
                PROCESS_QUERY_INFORMATION | PROCESS_VM_READ | PROCESS_VM_WRITE
                    | PROCESS_VM_OPERATION,
                false,
                pid,
            )
        };

        match handle {
            Ok(handle) => {
                self.handle = Some(OwnedHandle(handle));
                self.pid = pid as i32;
                true
            }
            Err(_) => false,
        }
    }

    /// Non-vetoing sanity signal: whether the page backing `addr` is
    /// currently valid in the target's working set. Query failures
    /// (e.g. missing permissions) never veto.
    fn working_set_valid(&self, handle: HANDLE, addr: u64) -> bool {
        let mut ws = PSAPI_WORKING_SET_EX_INFORMATION {
            VirtualAddress: addr as *mut c_void,
            ..Default::default()
        };

        // SAFETY: ws is a properly sized out-structure for a single query.
        let ok = unsafe {
            K32QueryWorkingSetEx(
                handle,
                (&raw mut ws).cast(),
                size_of::<PSAPI_WORKING_SET_EX_INFORMATION>() as u32,
            )
        };
        if !ok.as_bool() {
            return true;
        }

        // Bit 0 of the attribute block is the Valid flag.
        // SAFETY: reading the raw flags view of the union.
        unsafe { ws.VirtualAttributes.Flags & 1 == 1 }
    }
}

fn entry_name(entry: &PROCESSENTRY32W) -> String {
    let len = entry
        .szExeFile
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(entry.szExeFile.len());
    String::from_utf16_lossy(&entry.szExeFile[..len])
}

fn keep_region(mbi: &MEMORY_BASIC_INFORMATION) -> bool {
    if mbi.State != MEM_COMMIT {
        return false;
    }
    if mbi.Protect == PAGE_NOACCESS || mbi.Protect.contains(PAGE_GUARD) {
        return false;
    }
    mbi.Type == MEM_PRIVATE || mbi.Type == MEM_MAPPED
}

impl ProcessProbe for PlatformProbe {
    fn find_process(&mut self, selector: &NameSelector) -> Option<i32> {
        self.handle = None;
        self.pid = -1;

        // SAFETY: snapshot handle is owned below and closed on drop.
        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }.ok()?;
        let snapshot = OwnedHandle(snapshot);

        let mut entry = PROCESSENTRY32W {
            dwSize: size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        // SAFETY: entry.dwSize is initialized; the walk stops when the
        // API reports no further entries.
        unsafe {
            if Process32FirstW(snapshot.0, &mut entry).is_err() {
                return None;
            }
            loop {
                let name = entry_name(&entry);
                if selector.matches(&name) && self.open(entry.th32ProcessID) {
                    debug!("Matched emulator process {:?} (pid {})", name, self.pid);
                    return Some(self.pid);
                }
                if Process32NextW(snapshot.0, &mut entry).is_err() {
                    break;
                }
            }
        }

        None
    }

    fn enumerate_regions(&mut self) -> Option<Vec<Region>> {
        let handle = self.handle.as_ref()?.0;
        let mut regions = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let mut mbi = MEMORY_BASIC_INFORMATION::default();
            // SAFETY: mbi is a properly sized out-structure; a zero
            // return ends the walk.
            let written = unsafe {
                VirtualQueryEx(
                    handle,
                    Some(cursor as *const c_void),
                    &mut mbi,
                    size_of::<MEMORY_BASIC_INFORMATION>(),
                )
            };
            if written != size_of::<MEMORY_BASIC_INFORMATION>() {
                break;
            }

            if keep_region(&mbi) {
                let base = mbi.BaseAddress as u64;
                regions.push(Region::new(base, mbi.RegionSize as u64));

                // Sanity only; a stale working set must not hide the arena.
                if !self.working_set_valid(handle, base) {
                    debug!("Region at {:#x} not resident in working set", base);
                }
            }

            let next = (mbi.BaseAddress as u64).checked_add(mbi.RegionSize as u64);
            match next {
                Some(next) if next > cursor => cursor = next,
                _ => break,
            }
        }

        if regions.is_empty() { None } else { Some(regions) }
    }

    fn read_at(&self, host_addr: u64, buffer: &mut [u8]) -> bool {
        let Some(handle) = self.handle.as_ref() else {
            return false;
        };
        if buffer.is_empty() {
            return false;
        }

        let mut nread = 0usize;
        // SAFETY: the local buffer is valid for buffer.len() bytes; the
        // remote address is validated by the kernel.
        let ok = unsafe {
            ReadProcessMemory(
                handle.0,
                host_addr as *const c_void,
                buffer.as_mut_ptr().cast(),
                buffer.len(),
                Some(&mut nread),
            )
        };
        ok.is_ok() && nread == buffer.len()
    }

    fn write_at(&self, host_addr: u64, buffer: &[u8]) -> bool {
        let Some(handle) = self.handle.as_ref() else {
            return false;
        };
        if buffer.is_empty() {
            return false;
        }

        let mut nwrote = 0usize;
        // SAFETY: as in read_at; the local buffer is only read from.
        let ok = unsafe {
            WriteProcessMemory(
                handle.0,
                host_addr as *const c_void,
                buffer.as_ptr().cast(),
                buffer.len(),
                Some(&mut nwrote),
            )
        };
        ok.is_ok() && nwrote == buffer.len()
    }
}
