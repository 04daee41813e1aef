use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::{info, warn};
use serde::Serialize;

use crate::cpu::{Core, CoreConfig, CoreStats};
use crate::dram::{Dram, DramConfig, DramStats};
use crate::sim::clock::Clock;
use crate::sim::config::SimConfig;
use crate::sim::perf_log::SimReport;
use crate::sim::trace::{TraceError, TraceSource};
use crate::timeq::Cycle;

pub type SharedDram = Rc<RefCell<Dram>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimSummary {
    pub insns_retired: u64,
    pub cycles: Cycle,
}

impl SimSummary {
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            return 0.0;
        }
        self.insns_retired as f64 / self.cycles as f64
    }
}

impl fmt::Display for SimSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} instructions retired in {} cycles",
            self.insns_retired, self.cycles
        )
    }
}

/// Top level of a run: one core in front of one DRAM controller, both driven by a single clock.
/// Every cycle the core ticks first, then the DRAM.
pub struct Sim {
    config: SimConfig,
    clock: Clock,
    dram: SharedDram,
    core: Core<Box<dyn TraceSource>, SharedDram>,
}

impl Sim {
    pub fn new(
        config: SimConfig,
        core_config: &CoreConfig,
        dram_config: &DramConfig,
        trace: Box<dyn TraceSource>,
    ) -> Result<Self, TraceError> {
        let dram = Rc::new(RefCell::new(Dram::new(dram_config)));
        let core = Core::new(core_config, trace, Rc::clone(&dram))?;
        Ok(Self {
            config,
            clock: Clock::new(),
            dram,
            core,
        })
    }

    pub fn now(&self) -> Cycle {
        self.clock.now()
    }

    pub fn finished(&self) -> bool {
        self.now() >= self.config.cycles || (self.config.stop_on_drain && self.core.is_drained())
    }

    /// Simulate one cycle.
    pub fn step(&mut self) -> Result<(), TraceError> {
        let now = self.clock.now();
        self.core.tick(now)?;
        self.dram.borrow_mut().tick(now);
        self.clock.tick();
        Ok(())
    }

    /// Run until the cycle budget is spent, or until the core drains when `stop_on_drain` is set.
    pub fn simulate(&mut self) -> Result<SimSummary, TraceError> {
        info!("simulating up to {} cycles", self.config.cycles);
        while !self.finished() {
            self.step()?;
        }
        if !self.core.is_drained() {
            warn!(
                "cycle budget exhausted with {} rob entries and {} misses outstanding",
                self.core.rob().len(),
                self.core.outstanding_misses()
            );
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> SimSummary {
        SimSummary {
            insns_retired: self.core.insns_retired(),
            cycles: self.now(),
        }
    }

    pub fn core_stats(&self) -> CoreStats {
        self.core.stats()
    }

    pub fn dram_stats(&self) -> DramStats {
        self.dram.borrow().stats()
    }

    pub fn report(&self) -> SimReport {
        SimReport::new(self.summary(), self.core_stats(), self.dram_stats())
    }

    pub fn is_drained(&self) -> bool {
        self.core.is_drained()
    }
}
