//! Fixed-capacity ring buffer.
//!
//! Backs both the console log and the command history.

use std::collections::VecDeque;

/// A FIFO buffer holding at most `capacity` items.
///
/// Pushing into a full buffer evicts the oldest item.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::RingBuffer;
///
/// let mut ring = RingBuffer::new(2);
/// ring.push("a");
/// ring.push("b");
/// ring.push("c");
/// assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec!["b", "c"]);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Create an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of items held.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of items held.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item, returning the evicted oldest item if the buffer was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() >= self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    /// The most recently pushed item.
    #[inline]
    pub fn newest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Mutable access to the most recently pushed item.
    #[inline]
    pub fn newest_mut(&mut self) -> Option<&mut T> {
        self.items.back_mut()
    }

    /// Item by age, where 0 is the oldest.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// Iterate over the most recent `count` items, oldest to newest.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &T> {
        let skip = self.items.len().saturating_sub(count);
        self.items.iter().skip(skip)
    }

    /// Change the capacity, dropping the oldest items if it shrinks.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    /// Remove all items.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
