//! Configuration types
//!
//! Board-agnostic configuration structures, deserializable with the
//! `serde` feature.

pub mod types;

pub use types::*;
