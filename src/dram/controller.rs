use log::{debug, info};

use crate::base::mem::{MemRequest, MemRequestSink};
use crate::dram::address::AddressMap;
use crate::dram::config::DramConfig;
use crate::dram::stats::DramStats;
use crate::timeq::Cycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Hit,
    Miss,
    Conflict,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BankState {
    pub open_row: Option<u64>,
    /// The next cycle in which this bank can receive a new request.
    pub next_request: Cycle,
    /// The next cycle in which this bank can receive a conflict request.
    pub next_conflict: Cycle,
}

impl BankState {
    fn row_state(&self, row: u64) -> RowState {
        match self.open_row {
            None => RowState::Miss,
            Some(open) if open == row => RowState::Hit,
            Some(_) => RowState::Conflict,
        }
    }
}

#[derive(Debug)]
struct PendingRequest {
    channel: usize,
    bank: usize,
    row: u64,
    request: MemRequest,
}

#[derive(Debug)]
struct ChannelState {
    waiting: Vec<PendingRequest>,
    banks: Vec<BankState>,
    next_request: Cycle,
}

impl ChannelState {
    fn new(num_banks: usize) -> Self {
        Self {
            waiting: Vec::new(),
            banks: vec![BankState::default(); num_banks],
            next_request: 0,
        }
    }
}

/// DRAM controller with per-channel request queues and per-bank row-buffer state.  Each active
/// tick issues at most one request per channel; responses are delivered through the port carried
/// by the request.
#[derive(Debug)]
pub struct Dram {
    config: DramConfig,
    map: AddressMap,
    channels: Vec<ChannelState>,
    stats: DramStats,
}

impl Dram {
    pub fn new(config: &DramConfig) -> Self {
        assert!(config.clock_divider > 0, "clock divider must be > 0");
        let map = config.address_map();
        let channels = (0..map.num_channels())
            .map(|_| ChannelState::new(map.banks_per_channel()))
            .collect();
        info!(
            "dram instantiated: {} channels x {} banks, clock divider {}",
            map.num_channels(),
            map.banks_per_channel(),
            config.clock_divider
        );
        Self {
            config: *config,
            map,
            channels,
            stats: DramStats::default(),
        }
    }

    pub fn tick(&mut self, now: Cycle) {
        if now % self.config.clock_divider != 0 {
            return;
        }
        for ch in 0..self.channels.len() {
            if self.channels[ch].next_request > now {
                continue;
            }
            if let Some(req) = self.best_request(ch, now) {
                self.issue_request(now, req);
            }
        }
    }

    pub fn address_map(&self) -> &AddressMap {
        &self.map
    }

    pub fn stats(&self) -> DramStats {
        self.stats
    }

    pub fn bank(&self, channel: usize, bank: usize) -> &BankState {
        &self.channels[channel].banks[bank]
    }

    /// Requests waiting in all channel queues.
    pub fn pending(&self) -> usize {
        self.channels.iter().map(|chan| chan.waiting.len()).sum()
    }

    // Pick up to one waiting request of a channel and remove it from the queue.  The first row
    // hit wins; otherwise the oldest schedulable request, passing over conflicts on banks still
    // inside their tRAS window unless nothing else can go.
    fn best_request(&mut self, ch: usize, now: Cycle) -> Option<PendingRequest> {
        let chan = &self.channels[ch];
        let mut best = None;
        let mut deferred = None;
        for (i, req) in chan.waiting.iter().enumerate() {
            let bank = &chan.banks[req.bank];
            if bank.next_request > now {
                continue;
            }
            match bank.row_state(req.row) {
                RowState::Hit => {
                    best = Some(i);
                    break;
                }
                RowState::Conflict if bank.next_conflict > now => {
                    deferred.get_or_insert(i);
                }
                _ => {
                    best.get_or_insert(i);
                }
            }
        }
        let pick = if self.config.strict_tras {
            best
        } else {
            best.or(deferred)
        };
        pick.map(|i| self.channels[ch].waiting.remove(i))
    }

    fn issue_request(&mut self, now: Cycle, req: PendingRequest) {
        let div = self.config.clock_divider;
        let chan = &mut self.channels[req.channel];
        // Models average channel bandwidth only; commands and data of requests with different
        // row states may overlap on the bus.
        chan.next_request = now + self.config.t_ccd * div;
        let bank = &mut chan.banks[req.bank];
        let state = bank.row_state(req.row);
        let early = state == RowState::Conflict && bank.next_conflict > now;
        let mut delay = 0;
        if state != RowState::Hit {
            if state == RowState::Conflict {
                // precharge
                delay += self.config.t_rp;
            }
            // activate
            bank.next_conflict = now + (delay + self.config.t_ras) * div;
            delay += self.config.t_rcd;
            bank.open_row = Some(req.row);
        }
        // read/write
        delay += self.config.t_ccd;
        bank.next_request = now + delay * div;
        let ready_at = now + (delay + self.config.t_cl) * div;

        self.stats.record_issue(req.request.kind, state, early);
        debug!(
            "cycle {}: {:?} {:#x} ch {} bank {} row {:#x} {:?}, data at {}",
            now,
            req.request.kind,
            req.request.addr,
            req.channel,
            req.bank,
            req.row,
            state,
            ready_at
        );
        req.request.respond(ready_at);
    }
}

impl MemRequestSink for Dram {
    fn submit(&mut self, request: MemRequest) {
        let addr = request.addr;
        let req = PendingRequest {
            channel: self.map.channel(addr) as usize,
            bank: self.map.bank(addr) as usize,
            row: self.map.row(addr),
            request,
        };
        let chan = &mut self.channels[req.channel];
        chan.waiting.push(req);
        self.stats.record_queue_depth(chan.waiting.len());
    }
}
