use smallvec::SmallVec;
use std::collections::HashMap;

/// Outstanding miss to one address and the ROB slots waiting on it.
#[derive(Debug, Clone)]
pub struct MshrEntry {
    addr: u64,
    issued: bool,
    waiters: SmallVec<[usize; 4]>,
}

impl MshrEntry {
    fn new(addr: u64) -> Self {
        Self {
            addr,
            issued: false,
            waiters: SmallVec::new(),
        }
    }

    pub fn addr(&self) -> u64 {
        self.addr
    }

    pub fn issued(&self) -> bool {
        self.issued
    }

    pub fn mark_issued(&mut self) {
        self.issued = true;
    }

    pub fn waiters(&self) -> &[usize] {
        &self.waiters
    }
}

/// Miss table keyed by address.  At most one live entry per outstanding address.
#[derive(Debug, Default)]
pub struct MshrTable {
    entries: HashMap<u64, MshrEntry>,
    peak: usize,
}

impl MshrTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // High-water mark of simultaneously outstanding addresses.
    pub fn peak(&self) -> usize {
        self.peak
    }

    pub fn has_entry(&self, addr: u64) -> bool {
        self.entries.contains_key(&addr)
    }

    /// Record `rob_idx` as waiting on `addr`, allocating the entry on first miss.
    pub fn merge(&mut self, addr: u64, rob_idx: usize) -> &mut MshrEntry {
        let live = self.entries.len() + usize::from(!self.entries.contains_key(&addr));
        self.peak = self.peak.max(live);
        let entry = self
            .entries
            .entry(addr)
            .or_insert_with(|| MshrEntry::new(addr));
        entry.waiters.push(rob_idx);
        entry
    }

    pub fn remove_entry(&mut self, addr: u64) -> Option<MshrEntry> {
        self.entries.remove(&addr)
    }
}
