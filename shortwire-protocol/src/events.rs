//! Input event payload encoding
//!
//! Input sources on the counterpart side (pointer swipes, motion sensors)
//! produce floating point measurements. These helpers turn them into the
//! fixed-size payloads of swipe and acceleration records.

/// Swipe direction, encoded as a quadrant code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    /// Map any byte onto a direction using its two low bits
    pub fn from_bits(byte: u8) -> Self {
        match byte & 0x03 {
            0 => SwipeDirection::Left,
            1 => SwipeDirection::Right,
            2 => SwipeDirection::Up,
            _ => SwipeDirection::Down,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            SwipeDirection::Left => 0,
            SwipeDirection::Right => 1,
            SwipeDirection::Up => 2,
            SwipeDirection::Down => 3,
        }
    }
}

/// Round half up (`floor(x + 0.5)`) without relying on `std` float methods.
///
/// NaN maps to 0; out-of-range values saturate.
pub fn round_half_up(value: f32) -> i32 {
    let shifted = value + 0.5;
    let truncated = shifted as i32;
    if (truncated as f32) > shifted {
        truncated - 1
    } else {
        truncated
    }
}

/// Build a swipe payload: `[direction, strength]`
///
/// Strength is rounded and clamped to `0..=255`.
pub fn swipe_payload(direction: SwipeDirection, strength: f32) -> [u8; 2] {
    let strength = round_half_up(strength).clamp(0, 255) as u8;
    [direction.to_byte(), strength]
}

/// Encode one acceleration axis: rounded, clamped to `-128..=127`, biased by +128
pub fn encode_axis(value: f32) -> u8 {
    (round_half_up(value).clamp(-128, 127) + 128) as u8
}

/// Build an acceleration payload: `[x, y, z]`
pub fn acceleration_payload(x: f32, y: f32, z: f32) -> [u8; 3] {
    [encode_axis(x), encode_axis(y), encode_axis(z)]
}

/// Recover a signed axis value from its biased wire byte
pub fn decode_axis(byte: u8) -> i8 {
    (byte as i16 - 128) as i8
}
