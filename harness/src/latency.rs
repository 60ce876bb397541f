//! Expectation queues that line DUT outputs up with the inputs that produced
//! them.
//!
//! [`LatencyTracker`] models a constant pipeline depth: one slot is pushed per
//! cycle and the slot at the head is due once `depth + 1` slots are queued.
//! [`ValidTracker`] covers DUTs with variable latency, popping an expectation
//! only when the DUT raises its output-valid signal.

use std::collections::VecDeque;

/// A reference result scheduled for comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expected<T> {
    /// Test-case index of the input that produced this entry.
    pub index: usize,
    pub valid: bool,
    pub output: T,
}

/// The head of a fixed-latency queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot<T> {
    Scheduled(Expected<T>),
    /// A cycle that keeps the queue aligned but carries no comparison.
    Bubble,
}

#[derive(Clone, Debug)]
pub struct LatencyTracker<T> {
    depth: usize,
    slots: VecDeque<Slot<T>>,
}

impl<T> LatencyTracker<T> {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            slots: VecDeque::with_capacity(depth + 1),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Scheduled entries still waiting for their output.
    pub fn pending(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Scheduled(_)))
            .count()
    }

    pub fn push(&mut self, index: usize, valid: bool, output: T) {
        self.slots.push_back(Slot::Scheduled(Expected {
            index,
            valid,
            output,
        }));
    }

    pub fn push_bubble(&mut self) {
        self.slots.push_back(Slot::Bubble);
    }

    /// Pops the head once the input it describes was applied `depth` cycles
    /// ago, i.e. once `depth + 1` slots are queued.
    pub fn pop_due(&mut self) -> Option<Slot<T>> {
        if self.slots.len() > self.depth {
            self.slots.pop_front()
        } else {
            None
        }
    }
}

/// What a [`ValidTracker`] makes of one cycle's output-valid signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Observation<T> {
    /// Output not valid this cycle.
    Idle,
    /// Output valid; compare it against this expectation.
    Matched(T),
    /// Output valid with nothing outstanding.
    Spurious,
}

#[derive(Clone, Debug)]
pub struct ValidTracker<T> {
    outstanding: VecDeque<T>,
}

impl<T> Default for ValidTracker<T> {
    fn default() -> Self {
        Self {
            outstanding: VecDeque::new(),
        }
    }
}

impl<T> ValidTracker<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.outstanding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outstanding.is_empty()
    }

    pub fn push(&mut self, expected: T) {
        self.outstanding.push_back(expected);
    }

    pub fn observe(&mut self, output_valid: bool) -> Observation<T> {
        if !output_valid {
            return Observation::Idle;
        }
        match self.outstanding.pop_front() {
            Some(expected) => Observation::Matched(expected),
            None => Observation::Spurious,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_due_after_depth_cycles() {
        let mut tracker = LatencyTracker::new(2);
        tracker.push(0, true, 'a');
        assert_eq!(tracker.pop_due(), None);
        tracker.push(1, true, 'b');
        assert_eq!(tracker.pop_due(), None);
        tracker.push(2, false, 'c');
        assert_eq!(
            tracker.pop_due(),
            Some(Slot::Scheduled(Expected {
                index: 0,
                valid: true,
                output: 'a'
            }))
        );
        assert_eq!(tracker.pop_due(), None);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn strict_fifo_order() {
        let mut tracker = LatencyTracker::new(2);
        let mut popped = Vec::new();
        for i in 0..10 {
            tracker.push(i, true, i * 10);
            if let Some(Slot::Scheduled(expected)) = tracker.pop_due() {
                popped.push(expected.index);
            }
        }
        assert_eq!(popped, (0..8).collect::<Vec<_>>());
        assert_eq!(tracker.pending(), 2);
    }

    #[test]
    fn bubbles_flush_pending_entries() {
        let mut tracker = LatencyTracker::new(2);
        tracker.push(0, true, ());
        tracker.push(1, true, ());
        let mut flushed = Vec::new();
        for _ in 0..5 {
            tracker.push_bubble();
            match tracker.pop_due() {
                Some(Slot::Scheduled(expected)) => flushed.push(expected.index),
                Some(Slot::Bubble) | None => {}
            }
        }
        assert_eq!(flushed, vec![0, 1]);
        assert_eq!(tracker.pending(), 0);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn zero_depth_is_combinational() {
        let mut tracker = LatencyTracker::new(0);
        tracker.push(0, true, 5u32);
        assert!(matches!(tracker.pop_due(), Some(Slot::Scheduled(_))));
        assert!(tracker.is_empty());
    }

    #[test]
    fn valid_tracker_pairs_in_order() {
        let mut tracker = ValidTracker::new();
        tracker.push(1);
        tracker.push(2);
        assert_eq!(tracker.observe(false), Observation::Idle);
        assert_eq!(tracker.observe(true), Observation::Matched(1));
        assert_eq!(tracker.observe(false), Observation::Idle);
        assert_eq!(tracker.observe(true), Observation::Matched(2));
        assert_eq!(tracker.observe(true), Observation::Spurious);
        assert!(tracker.is_empty());
    }
}
