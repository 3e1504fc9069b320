//! Audio playback hooks

/// Trait for the audio player driven by the host
///
/// Calls happen on the bridge's task queue after a command (and its
/// argument) has been fully received. Implementations must not block; a
/// player that loads data asynchronously should kick off the load and
/// return.
pub trait PlaybackHooks {
    /// Start playing the track with the given id
    fn play(&mut self, track: u8);

    /// Stop playback
    fn stop(&mut self);

    /// Set the output volume (0-255, player-defined scale)
    fn set_volume(&mut self, level: u8);
}

