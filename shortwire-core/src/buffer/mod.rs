//! DATA stream buffering
//!
//! [`ByteRing`] stores raw bytes with overwrite-oldest semantics;
//! [`PacketQueue`] frames records on top of it.

pub mod queue;
pub mod ring;

pub use queue::{PacketQueue, PacketRecord, QueueError};
pub use ring::ByteRing;
