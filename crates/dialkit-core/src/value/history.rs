//! Bounded buffer of recently committed values.

use std::collections::VecDeque;

/// Capacity used when nothing else is configured.
pub const DEFAULT_HISTORY_CAPACITY: usize = 8;

/// Fixed-capacity FIFO of committed values. The oldest entry is evicted first.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRing<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T: Copy> Default for HistoryRing<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<T: Copy> HistoryRing<T> {
    /// Create an empty ring. A zero capacity keeps nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a committed value.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(value);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent value, if any.
    pub fn latest(&self) -> Option<T> {
        self.entries.back().copied()
    }

    /// Entries from newest to oldest, the order a menu lists them in.
    pub fn newest_first(&self) -> impl Iterator<Item = T> + '_ {
        self.entries.iter().rev().copied()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.entries.iter().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_last_n() {
        let mut ring = HistoryRing::new(3);
        for v in [1, 2, 3, 4] {
            ring.push(v);
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert!(!ring.iter().any(|v| v == 1));
    }

    #[test]
    fn test_newest_first() {
        let mut ring = HistoryRing::default();
        ring.push(0.5);
        ring.push(0.75);
        assert_eq!(ring.newest_first().collect::<Vec<_>>(), vec![0.75, 0.5]);
        assert_eq!(ring.latest(), Some(0.75));
    }

    #[test]
    fn test_default_capacity() {
        let mut ring = HistoryRing::default();
        for v in 0..20 {
            ring.push(v);
        }
        assert_eq!(ring.capacity(), DEFAULT_HISTORY_CAPACITY);
        assert_eq!(ring.len(), DEFAULT_HISTORY_CAPACITY);
        assert_eq!(ring.latest(), Some(19));
    }

    #[test]
    fn test_zero_capacity() {
        let mut ring = HistoryRing::new(0);
        ring.push(1);
        assert!(ring.is_empty());
    }
}
