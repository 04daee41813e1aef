use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CoreStats {
    pub insns_retired: u64,
    pub precursor_insns: u64,
    pub reads_issued: u64,
    pub reads_coalesced: u64,
    pub writes_issued: u64,
    pub responses_delivered: u64,
    pub rob_full_cycles: u64,
    pub peak_outstanding_misses: u64,
}

impl CoreStats {
    pub fn mem_insns(&self) -> u64 {
        self.reads_issued + self.reads_coalesced + self.writes_issued
    }
}
