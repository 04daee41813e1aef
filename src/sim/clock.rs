use crate::timeq::Cycle;

/// Global cycle counter.  Owned by the driver and advanced once per simulated cycle; components
/// only ever see the current cycle as an argument to their `tick`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    cycle: Cycle,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Cycle {
        self.cycle
    }

    pub fn tick(&mut self) {
        self.cycle += 1;
    }
}
