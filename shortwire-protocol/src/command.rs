//! Command codes written by the host to the CMD register

/// Commands understood by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Start playing an audio track (argument: track id)
    Play,
    /// Stop playback
    Stop,
    /// Set playback volume (argument: level)
    SetVolume,
    /// Ask the counterpart for a text (argument: request id)
    RequestText,
    /// Clear all queued data, flags and in-flight requests
    Reset,
}

// Wire format values
const CMD_PLAY: u8 = 0x20;
const CMD_STOP: u8 = 0x21;
const CMD_SET_VOLUME: u8 = 0x22;
const CMD_REQUEST_TEXT: u8 = 0x30;
const CMD_RESET: u8 = 0x3F;

impl Command {
    /// Parse a command from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_PLAY => Some(Command::Play),
            CMD_STOP => Some(Command::Stop),
            CMD_SET_VOLUME => Some(Command::SetVolume),
            CMD_REQUEST_TEXT => Some(Command::RequestText),
            CMD_RESET => Some(Command::Reset),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Command::Play => CMD_PLAY,
            Command::Stop => CMD_STOP,
            Command::SetVolume => CMD_SET_VOLUME,
            Command::RequestText => CMD_REQUEST_TEXT,
            Command::Reset => CMD_RESET,
        }
    }

    /// Returns true if the command waits for a write to ARG before it runs
    pub fn takes_argument(&self) -> bool {
        matches!(
            self,
            Command::Play | Command::SetVolume | Command::RequestText
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(Command::from_byte(0x20), Some(Command::Play));
        assert_eq!(Command::from_byte(0x21), Some(Command::Stop));
        assert_eq!(Command::from_byte(0x22), Some(Command::SetVolume));
        assert_eq!(Command::from_byte(0x30), Some(Command::RequestText));
        assert_eq!(Command::from_byte(0x3F), Some(Command::Reset));
        assert_eq!(Command::RequestText.to_byte(), 0x30);
    }

    #[test]
    fn test_unknown_codes() {
        assert!(Command::from_byte(0x00).is_none());
        assert!(Command::from_byte(0x23).is_none());
        assert!(Command::from_byte(0xFF).is_none());
    }

    #[test]
    fn test_takes_argument() {
        assert!(Command::Play.takes_argument());
        assert!(Command::SetVolume.takes_argument());
        assert!(Command::RequestText.takes_argument());
        assert!(!Command::Stop.takes_argument());
        assert!(!Command::Reset.takes_argument());
    }
}
