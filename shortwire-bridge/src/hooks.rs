//! Default collaborators
//!
//! Used when the embedding application does not install its own.

use std::future::ready;

use log::info;

use shortwire_core::traits::{PlaybackHooks, TextFuture, TextProvider};

/// Playback hooks that only log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPlayback;

impl PlaybackHooks for LogPlayback {
    fn play(&mut self, track: u8) {
        info!("Playback: play track {}", track);
    }

    fn stop(&mut self) {
        info!("Playback: stop");
    }

    fn set_volume(&mut self, level: u8) {
        info!("Playback: volume {}", level);
    }
}

/// Text provider answering every id with a fixed template
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoTextProvider;

impl EchoTextProvider {
    /// The text returned for `id`
    pub fn text_for(id: u8) -> String {
        format!("Text response for req {}", id)
    }
}

impl TextProvider for EchoTextProvider {
    fn fetch(&self, id: u8) -> TextFuture {
        Box::pin(ready(Ok(Self::text_for(id))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn test_echo_text() {
        let text = block_on(EchoTextProvider.fetch(12)).unwrap();
        assert_eq!(text, "Text response for req 12");
    }
}
