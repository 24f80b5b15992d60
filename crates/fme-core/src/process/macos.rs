//! macOS probe: `sysctl` process listing, `task_for_pid` and the Mach
//! VM calls. `task_for_pid` requires the debugging entitlement or root.

use std::ffi::CStr;
use std::mem;

use mach2::kern_return::KERN_SUCCESS;
use mach2::mach_port::mach_port_deallocate;
use mach2::message::mach_msg_type_number_t;
use mach2::port::{MACH_PORT_NULL, mach_port_t};
use mach2::traps::{mach_task_self, task_for_pid};
use mach2::vm::{mach_vm_read_overwrite, mach_vm_region, mach_vm_write};
use mach2::vm_prot::{VM_PROT_READ, VM_PROT_WRITE};
use mach2::vm_region::{VM_REGION_BASIC_INFO_64, vm_region_basic_info_data_64_t, vm_region_info_t};
use mach2::vm_types::{mach_vm_address_t, mach_vm_size_t};
use tracing::debug;

use super::{NameSelector, ProcessProbe};
use crate::memory::Region;

/// Task port that deallocates itself when the probe goes away.
struct TaskPort(mach_port_t);

impl Drop for TaskPort {
    fn drop(&mut self) {
        // SAFETY: the port was acquired by task_for_pid and is released
        // exactly once.
        unsafe {
            mach_port_deallocate(mach_task_self(), self.0);
        }
    }
}

pub struct PlatformProbe {
    pid: i32,
    task: Option<TaskPort>,
}

impl PlatformProbe {
    pub fn new() -> Self {
        Self { pid: -1, task: None }
    }

    /// All processes on the system, as `(pid, short name)` pairs.
    fn list_processes() -> Option<Vec<(i32, String)>> {
        let mut mib = [libc::CTL_KERN, libc::KERN_PROC, libc::KERN_PROC_ALL, 0];
        let mut size: libc::size_t = 0;

        // SAFETY: first call sizes the buffer, second fills it; the
        // kernel may shrink `size` if processes exited in between.
        unsafe {
            if libc::sysctl(
                mib.as_mut_ptr(),
                mib.len() as libc::c_uint,
                std::ptr::null_mut(),
                &mut size,
                std::ptr::null_mut(),
                0,
            ) == -1
            {
                return None;
            }

            let count = size as usize / mem::size_of::<libc::kinfo_proc>();
            let mut procs: Vec<libc::kinfo_proc> = Vec::with_capacity(count);
            if libc::sysctl(
                mib.as_mut_ptr(),
                mib.len() as libc::c_uint,
                procs.as_mut_ptr().cast(),
                &mut size,
                std::ptr::null_mut(),
                0,
            ) == -1
            {
                return None;
            }
            procs.set_len(size as usize / mem::size_of::<libc::kinfo_proc>());

            Some(
                procs
                    .iter()
                    .map(|p| {
                        let name = CStr::from_ptr(p.kp_proc.p_comm.as_ptr())
                            .to_string_lossy()
                            .into_owned();
                        (p.kp_proc.p_pid, name)
                    })
                    .collect(),
            )
        }
    }
}

impl ProcessProbe for PlatformProbe {
    fn find_process(&mut self, selector: &NameSelector) -> Option<i32> {
        self.task = None;
        self.pid = -1;

        for (pid, name) in Self::list_processes()? {
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

        let mut task: mach_port_t = MACH_PORT_NULL;
        // SAFETY: out-parameter call; a failure leaves `task` untouched.
        let kr = unsafe { task_for_pid(mach_task_self(), self.pid, &mut task) };
        if kr != KERN_SUCCESS {
            return None;
        }
        self.task = Some(TaskPort(task));

        let mut regions = Vec::new();
        let mut addr: mach_vm_address_t = 0;
        let mut size: mach_vm_size_t = 0;

        loop {
            // SAFETY: plain-old-data out-structure, filled by the kernel.
            let mut info: vm_region_basic_info_data_64_t = unsafe { mem::zeroed() };
            let mut count = (mem::size_of::<vm_region_basic_info_data_64_t>()
                / mem::size_of::<libc::c_int>()) as mach_msg_type_number_t;
            let mut object: mach_port_t = MACH_PORT_NULL;

            // SAFETY: all out-parameters are valid; the walk ends when
            // the kernel reports no further region at or above `addr`.
            let kr = unsafe {
                mach_vm_region(
                    task,
                    &mut addr,
                    &mut size,
                    VM_REGION_BASIC_INFO_64,
                    (&raw mut info) as vm_region_info_t,
                    &mut count,
                    &mut object,
                )
            };
            if kr != KERN_SUCCESS {
                break;
            }

            if info.protection & VM_PROT_READ != 0 && info.protection & VM_PROT_WRITE != 0 {
                regions.push(Region::new(addr, size));
            }

            addr = addr.wrapping_add(size);
        }

        if regions.is_empty() { None } else { Some(regions) }
    }

    fn read_at(&self, host_addr: u64, buffer: &mut [u8]) -> bool {
        let Some(task) = self.task.as_ref() else {
            return false;
        };
        if buffer.is_empty() {
            return false;
        }

        let mut nread: mach_vm_size_t = 0;
        // SAFETY: the destination buffer is valid for buffer.len()
        // bytes; the remote range is validated by the kernel.
        let kr = unsafe {
            mach_vm_read_overwrite(
                task.0,
                host_addr,
                buffer.len() as mach_vm_size_t,
                buffer.as_mut_ptr() as mach_vm_address_t,
                &mut nread,
            )
        };
        kr == KERN_SUCCESS && nread == buffer.len() as mach_vm_size_t
    }

    fn write_at(&self, host_addr: u64, buffer: &[u8]) -> bool {
        let Some(task) = self.task.as_ref() else {
            return false;
        };
        if buffer.is_empty() {
            return false;
        }

        // SAFETY: the source buffer outlives the call; mach_vm_write
        // copies it before returning.
        let kr = unsafe {
            mach_vm_write(
                task.0,
                host_addr,
                buffer.as_ptr() as mach2::vm_types::vm_offset_t,
                buffer.len() as mach_msg_type_number_t,
            )
        };
        kr == KERN_SUCCESS
    }
}
