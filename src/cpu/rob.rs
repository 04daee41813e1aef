use crate::timeq::Cycle;

/// Reorder buffer: a circular array of per-instruction ready cycles.  Slots are allocated at the
/// tail and retired from the head strictly in program order.
#[derive(Debug, Clone)]
pub struct Rob {
    slots: Vec<Cycle>,
    head: usize,
    tail: usize,
    insns: usize,
}

impl Rob {
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "rob size must be > 0");
        Self {
            slots: vec![0; size],
            head: 0,
            tail: 0,
            insns: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.insns
    }

    pub fn is_empty(&self) -> bool {
        self.insns == 0
    }

    pub fn is_full(&self) -> bool {
        self.insns == self.slots.len()
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn tail(&self) -> usize {
        self.tail
    }

    pub fn ready_at(&self, idx: usize) -> Cycle {
        self.slots[idx]
    }

    /// Allocate the tail slot with the given ready cycle and return its index.
    pub fn push(&mut self, ready_at: Cycle) -> usize {
        assert!(!self.is_full(), "rob overflow");
        let idx = self.tail;
        self.slots[idx] = ready_at;
        self.tail = self.advance(self.tail);
        self.insns += 1;
        idx
    }

    pub fn set_ready(&mut self, idx: usize, ready_at: Cycle) {
        self.slots[idx] = ready_at;
    }

    /// Pop the head slot if its instruction is ready at `now`.
    pub fn retire_ready(&mut self, now: Cycle) -> bool {
        if self.is_empty() || self.slots[self.head] > now {
            return false;
        }
        self.head = self.advance(self.head);
        self.insns -= 1;
        true
    }

    fn advance(&self, idx: usize) -> usize {
        if idx + 1 >= self.slots.len() {
            0
        } else {
            idx + 1
        }
    }
}
