//! Deferred register writes
//!
//! Host writes to CMD and ARG are not applied in the caller's context. They
//! are queued here and drained by the bridge runtime in arrival order.

use std::collections::VecDeque;

/// A host write waiting to be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterWrite {
    /// Write to CMD
    Command(u8),
    /// Write to ARG
    Argument(u8),
}

/// FIFO of pending register writes
///
/// Unbounded: a host write never fails or blocks.
#[derive(Debug, Default)]
pub(crate) struct TaskQueue {
    writes: VecDeque<RegisterWrite>,
}

impl TaskQueue {
    pub fn push(&mut self, write: RegisterWrite) {
        self.writes.push_back(write);
    }

    pub fn pop(&mut self) -> Option<RegisterWrite> {
        self.writes.pop_front()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = TaskQueue::default();
        queue.push(RegisterWrite::Command(0x20));
        queue.push(RegisterWrite::Argument(3));
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.pop(), Some(RegisterWrite::Command(0x20)));
        assert_eq!(queue.pop(), Some(RegisterWrite::Argument(3)));
        assert_eq!(queue.pop(), None);
    }
}
