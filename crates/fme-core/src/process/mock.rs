//! Scriptable probe over a fake address space, for attachment and
//! accessor tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{NameSelector, ProcessProbe};
use crate::memory::Region;

/// Sparse fake address space: committed ranges read as zero unless a
/// byte was explicitly written.
#[derive(Default)]
struct FakeSpace {
    committed: Vec<(u64, u64)>,
    bytes: HashMap<u64, u8>,
}

impl FakeSpace {
    fn commit(&mut self, base: u64, len: u64) {
        self.committed.push((base, len));
    }

    /// A transfer must land entirely inside one committed range.
    fn covered(&self, addr: u64, len: usize) -> bool {
        self.committed
            .iter()
            .any(|&(base, size)| addr >= base && addr + len as u64 <= base + size)
    }

    fn read(&self, addr: u64, buffer: &mut [u8]) -> bool {
        if !self.covered(addr, buffer.len()) {
            return false;
        }
        buffer.fill(0);
        let end = addr + buffer.len() as u64;
        for (&a, &b) in &self.bytes {
            if a >= addr && a < end {
                buffer[(a - addr) as usize] = b;
            }
        }
        true
    }

    fn write(&mut self, addr: u64, buffer: &[u8]) -> bool {
        if !self.covered(addr, buffer.len()) {
            return false;
        }
        for (i, b) in buffer.iter().enumerate() {
            self.bytes.insert(addr + i as u64, *b);
        }
        true
    }
}

struct MockState {
    pid: Option<i32>,
    process_name: String,
    regions: Vec<Region>,
    space: Mutex<FakeSpace>,
    fail_enumeration: bool,
    released: AtomicUsize,
}

/// Fake probe. Clones share the same underlying state, so a re-hook
/// can be fed a fresh probe instance over the same fake process.
pub struct MockProbe {
    state: Arc<MockState>,
}

impl Clone for MockProbe {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl Drop for MockProbe {
    fn drop(&mut self) {
        self.state.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl MockProbe {
    pub fn builder() -> MockProbeBuilder {
        MockProbeBuilder::default()
    }

    /// Number of probe instances released so far.
    pub fn released(&self) -> usize {
        self.state.released.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct MockProbeBuilder {
    pid: Option<i32>,
    process_name: Option<String>,
    regions: Vec<Region>,
    space: FakeSpace,
    fail_enumeration: bool,
}

impl MockProbeBuilder {
    pub fn pid(mut self, pid: i32) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn process_name(mut self, name: &str) -> Self {
        self.process_name = Some(name.to_string());
        self
    }

    /// Add a region to the snapshot and commit its bytes.
    pub fn region(mut self, base: u64, size: u64) -> Self {
        self.regions.push(Region::new(base, size));
        self.space.commit(base, size);
        self
    }

    /// Add a region to the snapshot whose bytes are not actually
    /// committed (transfers through it fail).
    pub fn unbacked_region(mut self, base: u64, size: u64) -> Self {
        self.regions.push(Region::new(base, size));
        self
    }

    /// Commit `len` bytes without declaring a region.
    pub fn backed(mut self, addr: u64, len: u64) -> Self {
        self.space.commit(addr, len);
        self
    }

    pub fn bytes(mut self, addr: u64, data: &[u8]) -> Self {
        self.space.commit(addr, data.len() as u64);
        for (i, b) in data.iter().enumerate() {
            self.space.bytes.insert(addr + i as u64, *b);
        }
        self
    }

    pub fn fail_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    pub fn build(self) -> MockProbe {
        MockProbe {
            state: Arc::new(MockState {
                pid: self.pid,
                process_name: self.process_name.unwrap_or_else(|| "flycast".to_string()),
                regions: self.regions,
                space: Mutex::new(self.space),
                fail_enumeration: self.fail_enumeration,
                released: AtomicUsize::new(0),
            }),
        }
    }
}

impl ProcessProbe for MockProbe {
    fn find_process(&mut self, selector: &NameSelector) -> Option<i32> {
        let pid = self.state.pid?;
        selector.matches(&self.state.process_name).then_some(pid)
    }

    fn enumerate_regions(&mut self) -> Option<Vec<Region>> {
        if self.state.fail_enumeration || self.state.regions.is_empty() {
            return None;
        }
        Some(self.state.regions.clone())
    }

    fn read_at(&self, host_addr: u64, buffer: &mut [u8]) -> bool {
        self.state.space.lock().unwrap().read(host_addr, buffer)
    }

    fn write_at(&self, host_addr: u64, buffer: &[u8]) -> bool {
        self.state.space.lock().unwrap().write(host_addr, buffer)
    }
}
