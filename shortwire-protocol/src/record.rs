//! Record framing for the DATA register stream.
//!
//! Record format:
//! - TYPE (1 byte): record type identifier, see [`RecordType`]
//! - LENGTH (1 byte): payload length (0-255)
//! - PAYLOAD (0-255 bytes): type-specific data
//!
//! Records are written by the bridge and read back one byte at a time by the
//! host. [`RecordParser`] is the host-side reassembler.

use heapless::Vec;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 255;

/// Maximum complete record size (TYPE + LENGTH + MAX_PAYLOAD)
pub const MAX_RECORD_SIZE: usize = 2 + MAX_PAYLOAD_SIZE;

/// Value returned by a DATA read while the queue is empty.
///
/// Indistinguishable from a payload byte of `0xFF`; hosts should only read
/// DATA while [`Status::RX_READY`](crate::Status::RX_READY) is set.
pub const EMPTY_READ: u8 = 0xFF;

// Record type IDs: events
const TYPE_SWIPE: u8 = 0x01;
const TYPE_ACCELERATION: u8 = 0x02;

// Record type IDs: responses
const TYPE_TEXT: u8 = 0x10;
const TYPE_ERROR: u8 = 0x7E;

/// Record types carried on the DATA stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordType {
    /// Swipe gesture event: `[direction, strength]`
    Swipe,
    /// Acceleration sample event: `[x, y, z]`, each biased by +128
    Acceleration,
    /// Text response to a `RequestText` command
    Text,
    /// Error response: `[code]` or `[code, context]`
    Error,
}

impl RecordType {
    /// Parse a record type from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            TYPE_SWIPE => Some(RecordType::Swipe),
            TYPE_ACCELERATION => Some(RecordType::Acceleration),
            TYPE_TEXT => Some(RecordType::Text),
            TYPE_ERROR => Some(RecordType::Error),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            RecordType::Swipe => TYPE_SWIPE,
            RecordType::Acceleration => TYPE_ACCELERATION,
            RecordType::Text => TYPE_TEXT,
            RecordType::Error => TYPE_ERROR,
        }
    }

    /// Returns true for time-sensitive input records (tracked by `EV_READY`)
    pub fn is_event(&self) -> bool {
        matches!(self, RecordType::Swipe | RecordType::Acceleration)
    }
}

/// Error codes carried in the first byte of an error record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// Reserved: counterpart did not answer in time
    Timeout,
    /// Reserved: counterpart unreachable
    Network,
    /// Reserved: requested item does not exist
    NotFound,
    /// Request failed (also used for text provider failures)
    Busy,
    /// Unknown command, or an argument with no pending command
    BadRequest,
}

impl ErrorCode {
    /// Parse an error code from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(ErrorCode::Timeout),
            2 => Some(ErrorCode::Network),
            3 => Some(ErrorCode::NotFound),
            4 => Some(ErrorCode::Busy),
            5 => Some(ErrorCode::BadRequest),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            ErrorCode::Timeout => 1,
            ErrorCode::Network => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::Busy => 4,
            ErrorCode::BadRequest => 5,
        }
    }
}

/// Errors that can occur while building or interpreting records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Type byte does not name a known record type
    UnknownType(u8),
    /// Payload length does not match the record type
    InvalidPayload,
}

impl core::fmt::Display for RecordError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RecordError::PayloadTooLarge => write!(f, "payload exceeds {} bytes", MAX_PAYLOAD_SIZE),
            RecordError::UnknownType(t) => write!(f, "unknown record type 0x{:02x}", t),
            RecordError::InvalidPayload => write!(f, "payload does not match record type"),
        }
    }
}

/// A record as seen on the DATA stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Raw record type byte
    pub record_type: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Record {
    /// Create a record with the given type byte and payload
    pub fn new(record_type: u8, payload: &[u8]) -> Result<Self, RecordError> {
        let mut vec = Vec::new();
        vec.extend_from_slice(payload)
            .map_err(|_| RecordError::PayloadTooLarge)?;
        Ok(Self {
            record_type,
            payload: vec,
        })
    }

    /// The typed record kind, if the type byte is known
    pub fn kind(&self) -> Option<RecordType> {
        RecordType::from_byte(self.record_type)
    }

    /// Number of bytes this record occupies on the wire
    pub fn framed_len(&self) -> usize {
        2 + self.payload.len()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Record {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Record {{ type: {=u8:#x}, payload: {=[u8]} }}",
            self.record_type,
            &self.payload[..]
        )
    }
}

/// State machine for reassembling records from DATA reads
#[derive(Debug, Clone)]
pub struct RecordParser {
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    expected_length: u8,
    record_type: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for TYPE
    WaitingForType,
    /// Got TYPE, waiting for LENGTH
    WaitingForLength,
    /// Reading payload bytes
    ReadingPayload,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordParser {
    /// Create a new record parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForType,
            buffer: Vec::new(),
            expected_length: 0,
            record_type: 0,
        }
    }

    /// Reset the parser state
    ///
    /// The host must do this after issuing a reset command, since any
    /// partially read record is discarded by the bridge.
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForType;
        self.buffer.clear();
        self.expected_length = 0;
        self.record_type = 0;
    }

    /// Returns true if the parser sits on a record boundary
    pub fn is_idle(&self) -> bool {
        self.state == ParseState::WaitingForType
    }

    /// Feed a single DATA byte to the parser
    ///
    /// Returns `Some(record)` once the last byte of a record arrives.
    pub fn feed(&mut self, byte: u8) -> Option<Record> {
        match self.state {
            ParseState::WaitingForType => {
                self.record_type = byte;
                self.state = ParseState::WaitingForLength;
                None
            }
            ParseState::WaitingForLength => {
                self.expected_length = byte;
                self.buffer.clear();
                if byte == 0 {
                    return Some(self.finish());
                }
                self.state = ParseState::ReadingPayload;
                None
            }
            ParseState::ReadingPayload => {
                // Cannot overflow: LENGTH is at most MAX_PAYLOAD_SIZE
                let _ = self.buffer.push(byte);
                if self.buffer.len() == self.expected_length as usize {
                    return Some(self.finish());
                }
                None
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete record found along with the number of
    /// bytes consumed. Bytes after a complete record are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (Option<Record>, usize) {
        for (i, &byte) in bytes.iter().enumerate() {
            if let Some(record) = self.feed(byte) {
                return (Some(record), i + 1);
            }
        }
        (None, bytes.len())
    }

    fn finish(&mut self) -> Record {
        let record = Record {
            record_type: self.record_type,
            payload: self.buffer.clone(),
        };
        self.reset();
        record
    }
}
