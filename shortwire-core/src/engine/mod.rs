//! Protocol engine
//!
//! Owns the packet queue, the command/argument state machine and the
//! error/busy flags that make up the STATUS register.

pub mod protocol;
pub mod state;

pub use protocol::ProtocolEngine;
pub use state::{Action, EngineState};
