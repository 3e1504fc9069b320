//! STATUS register bit flags

/// Value read from the STATUS register
///
/// Each bit is computed independently on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(u8);

impl Status {
    /// DATA has at least one byte queued
    pub const RX_READY: u8 = 1 << 0;
    /// Host may write CMD/ARG. Always set: writes are never refused
    pub const TX_READY: u8 = 1 << 1;
    /// An event record has not been fully read yet
    pub const EV_READY: u8 = 1 << 2;
    /// A text request is in flight
    pub const BUSY: u8 = 1 << 3;
    /// An error record was queued since the last reset (sticky)
    pub const ERROR: u8 = 1 << 4;
    /// Liveness marker, always set
    pub const ALIVE: u8 = 1 << 7;

    /// Status with only the always-on bits (`ALIVE`, `TX_READY`)
    pub const fn idle() -> Self {
        Self(Self::ALIVE | Self::TX_READY)
    }

    /// Wrap a raw status byte
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw register value
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if every bit in `flag` is set
    pub const fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    /// Return a copy with `flag` set when `on` is true
    #[must_use]
    pub const fn with(self, flag: u8, on: bool) -> Self {
        if on {
            Self(self.0 | flag)
        } else {
            self
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        status.0
    }
}
