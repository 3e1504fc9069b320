//! Record framing on top of [`ByteRing`]
//!
//! The ring only knows bytes. The queue keeps one [`PacketRecord`] per
//! framed record so that eviction always removes whole records: a ring-level
//! overwrite in the middle of a record would desynchronize every younger
//! record for the host.

use alloc::vec::Vec;

use shortwire_protocol::{RecordType, EMPTY_READ, MAX_PAYLOAD_SIZE};

use super::ring::ByteRing;

/// Compaction kicks in once more than this many consumed records pile up
const COMPACT_THRESHOLD: usize = 32;

/// Errors returned when a record cannot be queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueueError {
    /// Payload longer than 255 bytes
    PayloadTooLarge,
    /// Framed record larger than the whole ring
    RecordTooLarge,
}

impl core::fmt::Display for QueueError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            QueueError::PayloadTooLarge => {
                write!(f, "payload exceeds {} bytes", MAX_PAYLOAD_SIZE)
            }
            QueueError::RecordTooLarge => write!(f, "record does not fit in the ring"),
        }
    }
}

/// Bookkeeping for one framed record in the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacketRecord {
    pub record_type: RecordType,
    /// Bytes of this record still in the ring
    pub remaining: usize,
}

impl PacketRecord {
    pub fn is_event(&self) -> bool {
        self.record_type.is_event()
    }
}

/// Framed record queue
///
/// Invariant: the `remaining` counts of the active records (from `head`
/// onward) sum to the number of bytes in the ring.
#[derive(Debug, Clone)]
pub struct PacketQueue {
    ring: ByteRing,
    records: Vec<PacketRecord>,
    /// Index of the oldest active record; everything before it is consumed
    head: usize,
    has_event: bool,
}

impl PacketQueue {
    /// Create a queue over a ring of `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: ByteRing::new(capacity),
            records: Vec::new(),
            head: 0,
            has_event: false,
        }
    }

    /// Ring capacity in bytes
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Bytes waiting to be read
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// True while an event record has unread bytes
    pub fn has_event(&self) -> bool {
        self.has_event
    }

    /// Records that still have bytes in the ring, oldest first
    pub fn active_records(&self) -> &[PacketRecord] {
        &self.records[self.head..]
    }

    /// Frame `payload` as a record and append it
    ///
    /// Evicts the oldest whole records until the new one fits. Nothing is
    /// evicted when the record is rejected.
    pub fn enqueue(&mut self, record_type: RecordType, payload: &[u8]) -> Result<(), QueueError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(QueueError::PayloadTooLarge);
        }
        let total = payload.len() + 2;
        if total > self.ring.capacity() {
            return Err(QueueError::RecordTooLarge);
        }

        self.make_room(total);

        self.records.push(PacketRecord {
            record_type,
            remaining: total,
        });
        self.ring.push(record_type.to_byte());
        self.ring.push(payload.len() as u8);
        for &byte in payload {
            self.ring.push(byte);
        }
        self.has_event = self.compute_has_event();
        Ok(())
    }

    /// Read the next byte of the stream, or [`EMPTY_READ`] if there is none
    pub fn read_byte(&mut self) -> u8 {
        let Some(value) = self.ring.pop() else {
            return EMPTY_READ;
        };

        if let Some(record) = self.records.get_mut(self.head) {
            record.remaining = record.remaining.saturating_sub(1);
            if record.remaining == 0 {
                self.head += 1;
                self.compact();
            }
        }
        self.has_event = self.compute_has_event();
        value
    }

    /// Drop every queued byte and record
    pub fn clear(&mut self) {
        self.ring.clear();
        self.records.clear();
        self.head = 0;
        self.has_event = false;
    }

    /// Evict whole records from the front until `needed` bytes are free
    fn make_room(&mut self, needed: usize) {
        while self.ring.available() < needed && self.head < self.records.len() {
            let dropped = self.records[self.head];
            self.ring.discard(dropped.remaining);
            self.head += 1;
        }
        self.compact();
        self.has_event = self.compute_has_event();
    }

    /// Drop the consumed prefix once it dominates the record list
    fn compact(&mut self) {
        if self.head > COMPACT_THRESHOLD && self.head * 2 > self.records.len() {
            self.records.drain(..self.head);
            self.head = 0;
        }
    }

    fn compute_has_event(&self) -> bool {
        self.active_records()
            .iter()
            .any(|record| record.is_event() && record.remaining > 0)
    }
}
