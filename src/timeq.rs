/*
Time-queue for the performance model.

Components never call each other back synchronously.  A producer that knows when a piece of work
will complete pushes it into an `EventQueue` stamped with its ready cycle, and the consumer drains
whatever has come due at the start of its own tick.
*/

use std::cmp::Ordering;

use crate::builtin::Heap;

pub type Cycle = u64;

/// Ready cycle of a slot that waits on an event which has not been scheduled yet.
pub const CYCLE_INFINITY: Cycle = Cycle::MAX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timed<T> {
    pub ready_at: Cycle,
    pub payload: T,
}

fn earliest_first<T>(a: &Timed<T>, b: &Timed<T>) -> Ordering {
    b.ready_at.cmp(&a.ready_at)
}

/// Min-queue of payloads keyed by the cycle at which they become visible.
#[derive(Debug, Clone)]
pub struct EventQueue<T> {
    heap: Heap<Timed<T>>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self {
            heap: Heap::new(earliest_first::<T>),
        }
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ready_at: Cycle, payload: T) {
        self.heap.push(Timed { ready_at, payload });
    }

    // Cycle of the earliest pending event.
    pub fn next_ready_at(&self) -> Option<Cycle> {
        self.heap.peek().map(|timed| timed.ready_at)
    }

    pub fn pop(&mut self) -> Option<Timed<T>> {
        self.heap.pop()
    }

    // Pop the earliest event only if it is due at `now`.
    pub fn pop_due(&mut self, now: Cycle) -> Option<Timed<T>> {
        match self.next_ready_at() {
            Some(ready_at) if ready_at <= now => self.heap.pop(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
