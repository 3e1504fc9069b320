//! Host runtime for the Short Protocol v1 register bridge
//!
//! Wires a [`ProtocolEngine`](shortwire_core::ProtocolEngine) to the four
//! host registers:
//!
//! - CMD/ARG writes are deferred onto a FIFO task queue
//! - STATUS/DATA reads and input events apply immediately
//! - Text lookups run as futures polled by [`Bridge::run`]
//!
//! Logging goes through the `log` facade.

#![deny(unsafe_code)]

pub mod bridge;
pub mod config;
pub mod hooks;
pub mod input;
pub mod ports;
mod requests;
mod tasks;

pub use bridge::Bridge;
pub use config::{load_config, ConfigError};
pub use hooks::{EchoTextProvider, LogPlayback};
pub use input::{MotionThrottle, Swipe, SwipeTracker};
pub use ports::PortBus;
pub use tasks::RegisterWrite;

pub use shortwire_core::config::{BridgeConfig, InputConfig, PortMap};
pub use shortwire_core::traits::{PlaybackHooks, TextError, TextFuture, TextProvider};
pub use shortwire_protocol::Status;
