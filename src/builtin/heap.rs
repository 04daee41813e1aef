use std::cmp::Ordering;

/// Binary max-heap over a growable array, ordered by a caller-supplied comparison.
///
/// `compare(a, b) == Ordering::Greater` means `a` belongs closer to the top. A parent never
/// compares less than either of its children; equal keys come out in no particular order.
#[derive(Debug, Clone)]
pub struct Heap<T> {
    storage: Vec<T>,
    compare: fn(&T, &T) -> Ordering,
}

impl<T> Heap<T> {
    pub fn new(compare: fn(&T, &T) -> Ordering) -> Self {
        Self {
            storage: Vec::new(),
            compare,
        }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn peek(&self) -> Option<&T> {
        self.storage.first()
    }

    pub fn push(&mut self, item: T) {
        self.storage.push(item);
        self.sift_up(self.storage.len() - 1);
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.storage.is_empty() {
            return None;
        }
        let last = self.storage.len() - 1;
        self.storage.swap(0, last);
        let top = self.storage.pop();
        self.sift_down(0);
        top
    }

    fn sift_up(&mut self, mut child: usize) {
        while child > 0 {
            let parent = (child - 1) / 2;
            if (self.compare)(&self.storage[parent], &self.storage[child]) != Ordering::Less {
                break;
            }
            self.storage.swap(parent, child);
            child = parent;
        }
    }

    fn sift_down(&mut self, mut parent: usize) {
        let len = self.storage.len();
        loop {
            let left = 2 * parent + 1;
            let right = left + 1;
            let mut top = parent;
            if left < len
                && (self.compare)(&self.storage[left], &self.storage[top]) == Ordering::Greater
            {
                top = left;
            }
            if right < len
                && (self.compare)(&self.storage[right], &self.storage[top]) == Ordering::Greater
            {
                top = right;
            }
            if top == parent {
                break;
            }
            self.storage.swap(parent, top);
            parent = top;
        }
    }

    #[cfg(test)]
    fn holds_heap_property(&self) -> bool {
        (1..self.storage.len()).all(|child| {
            let parent = (child - 1) / 2;
            (self.compare)(&self.storage[parent], &self.storage[child]) != Ordering::Less
        })
    }
}
