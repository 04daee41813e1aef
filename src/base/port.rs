//! `ResponsePort` models the return path from the memory system into a core.
//!
//! The core keeps one end and hands clones to every read it issues.  The memory controller
//! schedules a response by pushing it at its completion cycle; the core drains whatever has come
//! due at the start of its own tick.

use std::cell::RefCell;
use std::rc::Rc;

use crate::base::mem::MemResponse;
use crate::timeq::{Cycle, EventQueue, Timed};

#[derive(Debug, Clone, Default)]
pub struct ResponsePort(Rc<RefCell<EventQueue<MemResponse>>>);

impl ResponsePort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&self, ready_at: Cycle, response: MemResponse) {
        self.0.borrow_mut().push(ready_at, response);
    }

    pub fn pop_due(&self, now: Cycle) -> Option<Timed<MemResponse>> {
        self.0.borrow_mut().pop_due(now)
    }

    pub fn next_ready_at(&self) -> Option<Cycle> {
        self.0.borrow().next_ready_at()
    }

    /// Responses scheduled but not yet drained.
    pub fn pending(&self) -> usize {
        self.0.borrow().len()
    }
}
