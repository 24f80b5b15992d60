//! Stable, OS-agnostic facade over the attachment.
//!
//! Every operation addresses guest RAM by offset. The optional swap
//! flag requests one whole-buffer swap keyed on the transfer's total
//! length and applies only to lengths 2, 4 and 8; bulk transfers are
//! left in guest (little-endian) order. Mixed-width consumers must
//! issue one element per call.

use crate::attach::{Attachment, Status};
use crate::error::Result;
use crate::format::{self, MemBase, MemType};
use crate::memory::bswap_in_place;
use crate::memory::layout::RAM_SIZE;
use crate::process::{NameSelector, ProcessProbe};

pub struct Accessor<P: ProcessProbe> {
    attachment: Attachment<P>,
}

impl<P: ProcessProbe> Default for Accessor<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ProcessProbe> Accessor<P> {
    pub fn new() -> Self {
        Self {
            attachment: Attachment::new(),
        }
    }

    /// Hook with an externally constructed probe; process name
    /// selection comes from the environment.
    pub fn hook_with(&mut self, probe: P) {
        self.attachment.hook_with(probe);
    }

    /// Hook with an explicit process name selector.
    pub fn hook_with_selector(&mut self, probe: P, selector: &NameSelector) {
        self.attachment.hook_with_selector(probe, selector);
    }

    pub fn unhook(&mut self) {
        self.attachment.unhook();
    }

    pub fn status(&self) -> Status {
        self.attachment.status()
    }

    /// PID of the hooked emulator, or −1.
    pub fn pid(&self) -> i32 {
        self.attachment.pid()
    }

    /// Host address of guest main RAM (diagnostic only).
    pub fn ram_start(&self) -> u64 {
        self.attachment.ram_start()
    }

    /// Host address of AICA RAM (diagnostic only).
    pub fn aram_start(&self) -> u64 {
        self.attachment.aram_start()
    }

    pub fn aram_accessible(&self) -> bool {
        self.attachment.aram_accessible()
    }

    /// Always false: the Dreamcast has no MEM2. Retained for API
    /// parity with sibling tools.
    pub fn is_mem2_present(&self) -> bool {
        false
    }

    /// Guest main RAM size: 16 MiB.
    pub fn ram_total_size(&self) -> u32 {
        RAM_SIZE
    }

    pub fn is_valid_guest_address(&self, address: u32) -> bool {
        address < RAM_SIZE
    }

    /// Read `len` bytes at a guest offset.
    pub fn read(&self, offset: u32, len: usize, swap: bool) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; len];
        self.read_into(offset, &mut buffer, swap)?;
        Ok(buffer)
    }

    /// Read into a caller buffer; its length is the transfer size.
    pub fn read_into(&self, offset: u32, buffer: &mut [u8], swap: bool) -> Result<()> {
        self.attachment.read(offset, buffer)?;
        if swap {
            bswap_in_place(buffer);
        }
        Ok(())
    }

    /// Write bytes at a guest offset. With `swap`, a swapped temporary
    /// copy is sent; the caller's buffer is untouched.
    pub fn write(&self, offset: u32, data: &[u8], swap: bool) -> Result<()> {
        if swap {
            let mut swapped = data.to_vec();
            bswap_in_place(&mut swapped);
            self.attachment.write(offset, &swapped)
        } else {
            self.attachment.write(offset, data)
        }
    }

    /// Fill `buffer` (sized `ram_total_size()`) with the whole of
    /// guest RAM in one transfer.
    pub fn read_entire_ram(&self, buffer: &mut [u8]) -> Result<()> {
        self.read_into(0, buffer, false)
    }

    /// Read `size` raw bytes at `offset` and render them as
    /// `mem_type`, applying the type-derived swap.
    pub fn format_value(
        &self,
        offset: u32,
        mem_type: MemType,
        size: usize,
        base: MemBase,
        unsigned: bool,
    ) -> Result<String> {
        let bytes = self.read(offset, size, false)?;
        Ok(format::format_bytes(
            &bytes,
            mem_type,
            base,
            unsigned,
            format::should_swap_for_type(mem_type),
        ))
    }
}

#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
impl Accessor<crate::process::PlatformProbe> {
    /// Hook the live emulator process.
    pub fn hook(&mut self) {
        self.attachment.hook();
    }
}
