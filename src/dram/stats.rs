use serde::Serialize;

use crate::base::mem::MemRequestKind;
use crate::dram::controller::RowState;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct DramStats {
    reads: u64,
    writes: u64,
    row_hits: u64,
    row_misses: u64,
    row_conflicts: u64,
    // conflicts precharged before the bank's tRAS window closed
    early_conflicts: u64,
    peak_queue_depth: u64,
}

impl DramStats {
    pub fn reads(&self) -> u64 {
        self.reads
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn issued(&self) -> u64 {
        self.reads + self.writes
    }

    pub fn row_hits(&self) -> u64 {
        self.row_hits
    }

    pub fn row_misses(&self) -> u64 {
        self.row_misses
    }

    pub fn row_conflicts(&self) -> u64 {
        self.row_conflicts
    }

    pub fn early_conflicts(&self) -> u64 {
        self.early_conflicts
    }

    pub fn peak_queue_depth(&self) -> u64 {
        self.peak_queue_depth
    }

    pub fn row_hit_rate(&self) -> f64 {
        if self.issued() == 0 {
            return 0.0;
        }
        self.row_hits as f64 / self.issued() as f64
    }

    pub fn record_issue(&mut self, kind: MemRequestKind, state: RowState, early: bool) {
        match kind {
            MemRequestKind::Read => self.reads += 1,
            MemRequestKind::Write => self.writes += 1,
        }
        match state {
            RowState::Hit => self.row_hits += 1,
            RowState::Miss => self.row_misses += 1,
            RowState::Conflict => self.row_conflicts += 1,
        }
        if early {
            self.early_conflicts += 1;
        }
    }

    pub fn record_queue_depth(&mut self, depth: usize) {
        self.peak_queue_depth = self.peak_queue_depth.max(depth as u64);
    }
}
