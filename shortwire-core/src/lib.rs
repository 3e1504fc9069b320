//! Board-agnostic engine for the Short Protocol v1 register bridge
//!
//! This crate contains all protocol logic that does not depend on a
//! particular runtime or host bus:
//!
//! - Byte ring and record framing for the DATA register
//! - Command/argument state machine and STATUS computation
//! - Generation tracking for asynchronous text requests
//! - Collaborator traits (playback hooks, text provider)
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod buffer;
pub mod config;
pub mod engine;
pub mod request;
pub mod traits;

pub use buffer::{ByteRing, PacketQueue, QueueError};
pub use engine::{Action, EngineState, ProtocolEngine};
pub use request::{RequestOutcome, RequestTicket, RequestTracker};
