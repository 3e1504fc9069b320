//! Collaborator traits
//!
//! These traits define the interface between the protocol engine and the
//! host application: audio playback and the text lookup service.

pub mod playback;
pub mod text;

pub use playback::PlaybackHooks;
pub use text::{TextError, TextFuture, TextProvider};
