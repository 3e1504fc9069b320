//! Fixed-capacity byte ring with overwrite-oldest eviction

use alloc::boxed::Box;
use alloc::vec;

/// Circular byte store
///
/// Writers are never blocked: pushing into a full ring drops the oldest
/// byte. Framing-aware eviction lives one layer up in
/// [`PacketQueue`](super::PacketQueue).
#[derive(Debug, Clone)]
pub struct ByteRing {
    buffer: Box<[u8]>,
    /// Index of the oldest byte
    head: usize,
    /// Index the next byte is written to
    tail: usize,
    len: usize,
}

impl ByteRing {
    /// Create an empty ring holding up to `capacity` bytes (at least 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0u8; capacity.max(1)].into_boxed_slice(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Total number of bytes the ring can hold
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of bytes currently stored
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Free space in bytes
    pub fn available(&self) -> usize {
        self.capacity() - self.len
    }

    /// Append a byte, dropping the oldest one if the ring is full
    pub fn push(&mut self, value: u8) {
        let capacity = self.capacity();
        self.buffer[self.tail] = value;
        self.tail = (self.tail + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        } else {
            self.head = (self.head + 1) % capacity;
        }
    }

    /// Remove and return the oldest byte
    pub fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        let value = self.buffer[self.head];
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        Some(value)
    }

    /// Drop up to `count` of the oldest bytes
    pub fn discard(&mut self, count: usize) {
        let drop = count.min(self.len);
        self.head = (self.head + drop) % self.capacity();
        self.len -= drop;
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }
}
