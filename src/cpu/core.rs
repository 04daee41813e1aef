use log::{debug, info};

use crate::base::mem::{MemRequest, MemRequestSink, MemResponse};
use crate::base::port::ResponsePort;
use crate::cpu::config::CoreConfig;
use crate::cpu::mshr::MshrTable;
use crate::cpu::rob::Rob;
use crate::cpu::stats::CoreStats;
use crate::sim::trace::{TraceError, TraceRecord, TraceSource};
use crate::timeq::{Cycle, CYCLE_INFINITY};

/// Out-of-order core timing model.  Issues trace records into a reorder buffer, sends misses to
/// memory (coalescing concurrent reads to one address) and retires in program order.
#[derive(Debug)]
pub struct Core<T, M> {
    config: CoreConfig,
    trace: T,
    mem: M,
    rob: Rob,
    mshrs: MshrTable,
    responses: ResponsePort,
    // record being issued; `None` once the trace is exhausted
    cur: Option<TraceRecord>,
    stats: CoreStats,
}

impl<T: TraceSource, M: MemRequestSink> Core<T, M> {
    pub fn new(config: &CoreConfig, mut trace: T, mem: M) -> Result<Self, TraceError> {
        assert!(config.superscalar_width > 0, "superscalar width must be > 0");
        let cur = trace.next_record()?;
        info!(
            "core instantiated: width {}, rob {}",
            config.superscalar_width, config.rob_size
        );
        Ok(Self {
            config: *config,
            trace,
            mem,
            rob: Rob::new(config.rob_size),
            mshrs: MshrTable::new(),
            responses: ResponsePort::new(),
            cur,
            stats: CoreStats::default(),
        })
    }

    /// Advance one cycle: retire, then deliver due memory responses, then issue.
    pub fn tick(&mut self, now: Cycle) -> Result<(), TraceError> {
        self.tick_retire(now);
        self.tick_mem(now);
        self.tick_issue(now)
    }

    pub fn insns_retired(&self) -> u64 {
        self.stats.insns_retired
    }

    pub fn stats(&self) -> CoreStats {
        CoreStats {
            peak_outstanding_misses: self.mshrs.peak() as u64,
            ..self.stats
        }
    }

    pub fn rob(&self) -> &Rob {
        &self.rob
    }

    pub fn outstanding_misses(&self) -> usize {
        self.mshrs.len()
    }

    pub fn trace_exhausted(&self) -> bool {
        self.cur.is_none()
    }

    /// Nothing left to issue, retire or wait on.
    pub fn is_drained(&self) -> bool {
        self.cur.is_none() && self.rob.is_empty() && self.mshrs.is_empty()
    }

    pub fn mem(&self) -> &M {
        &self.mem
    }

    fn tick_retire(&mut self, now: Cycle) {
        let mut remaining = self.config.superscalar_width;
        while remaining > 0 && self.rob.retire_ready(now) {
            remaining -= 1;
            self.stats.insns_retired += 1;
        }
    }

    fn tick_mem(&mut self, now: Cycle) {
        while let Some(response) = self.responses.pop_due(now) {
            self.deliver(now, response.payload);
        }
    }

    fn tick_issue(&mut self, now: Cycle) -> Result<(), TraceError> {
        let mut remaining = self.config.superscalar_width;
        while remaining > 0 && !self.rob.is_full() {
            let Some(record) = self.cur.as_mut() else {
                break;
            };
            if record.precursor > 0 {
                // non-memory instruction ahead of the access; resolves on issue
                record.precursor -= 1;
                self.rob.push(now);
                self.stats.precursor_insns += 1;
            } else {
                let addr = record.addr;
                if record.is_write {
                    self.mem.submit(MemRequest::write(addr));
                    self.rob.push(now);
                    self.stats.writes_issued += 1;
                } else {
                    let idx = self.rob.push(CYCLE_INFINITY);
                    self.issue_read(addr, idx);
                }
                self.cur = self.trace.next_record()?;
            }
            remaining -= 1;
        }
        if remaining > 0 && self.rob.is_full() && self.cur.is_some() {
            self.stats.rob_full_cycles += 1;
        }
        Ok(())
    }

    fn issue_read(&mut self, addr: u64, rob_idx: usize) {
        let entry = self.mshrs.merge(addr, rob_idx);
        if entry.issued() {
            self.stats.reads_coalesced += 1;
            return;
        }
        entry.mark_issued();
        self.mem.submit(MemRequest::read(addr, self.responses.clone()));
        self.stats.reads_issued += 1;
    }

    fn deliver(&mut self, now: Cycle, response: MemResponse) {
        let Some(entry) = self.mshrs.remove_entry(response.addr) else {
            panic!("memory response for {:#x} with no outstanding miss", response.addr);
        };
        debug!(
            "cycle {}: fill {:#x} wakes {} rob slot(s)",
            now,
            response.addr,
            entry.waiters().len()
        );
        for &idx in entry.waiters() {
            self.rob.set_ready(idx, now);
        }
        self.stats.responses_delivered += 1;
    }
}
