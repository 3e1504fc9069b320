//! Short Protocol v1
//!
//! This crate defines the wire side of the four-register bridge between a
//! byte-addressable host machine and its richer counterpart. The host only
//! ever performs single-byte port reads and writes:
//!
//! | Register | Direction    | Purpose                                   |
//! |----------|--------------|-------------------------------------------|
//! | CMD      | host → bridge | command code                              |
//! | ARG      | host → bridge | argument for the pending command          |
//! | STATUS   | bridge → host | [`Status`] bit flags                      |
//! | DATA     | bridge → host | next byte of the framed record stream     |
//!
//! # Record Format
//!
//! Everything read from DATA is a sequence of records:
//! ```text
//! ┌──────┬────────┬─────────────┐
//! │ TYPE │ LENGTH │ PAYLOAD     │
//! │ 1B   │ 1B     │ 0–255B      │
//! └──────┴────────┴─────────────┘
//! ```
//!
//! There is no start byte or checksum; the host stays in sync by always
//! consuming whole records. Reading DATA while nothing is queued returns
//! [`EMPTY_READ`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod events;
pub mod packet;
pub mod record;
pub mod status;

pub use command::Command;
pub use events::{acceleration_payload, swipe_payload, SwipeDirection};
pub use packet::Packet;
pub use record::{
    ErrorCode, Record, RecordError, RecordParser, RecordType, EMPTY_READ, MAX_PAYLOAD_SIZE,
    MAX_RECORD_SIZE,
};
pub use status::Status;
