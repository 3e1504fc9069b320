//! Typed view of records read from the DATA stream
//!
//! Record types are divided into two categories:
//! - Events: swipe and acceleration input, time-sensitive
//! - Responses: text results and errors answering host commands

use crate::events::{decode_axis, SwipeDirection};
use crate::record::{ErrorCode, Record, RecordError, RecordType};

/// A decoded record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Packet<'a> {
    /// Swipe gesture
    Swipe {
        direction: SwipeDirection,
        strength: u8,
    },
    /// Acceleration sample, each axis in `-128..=127`
    Acceleration { x: i8, y: i8, z: i8 },
    /// Text response (UTF-8, possibly cut mid-character at 255 bytes)
    Text(&'a [u8]),
    /// Error response
    Error {
        /// Raw code byte; see [`ErrorCode`]
        code: u8,
        /// Offending command, argument or request id
        context: Option<u8>,
    },
}

impl<'a> Packet<'a> {
    /// Interpret a record
    pub fn from_record(record: &'a Record) -> Result<Self, RecordError> {
        let payload = &record.payload[..];
        match record.kind() {
            Some(RecordType::Swipe) => match payload {
                [direction, strength] => Ok(Packet::Swipe {
                    direction: SwipeDirection::from_bits(*direction),
                    strength: *strength,
                }),
                _ => Err(RecordError::InvalidPayload),
            },
            Some(RecordType::Acceleration) => match payload {
                [x, y, z] => Ok(Packet::Acceleration {
                    x: decode_axis(*x),
                    y: decode_axis(*y),
                    z: decode_axis(*z),
                }),
                _ => Err(RecordError::InvalidPayload),
            },
            Some(RecordType::Text) => Ok(Packet::Text(payload)),
            Some(RecordType::Error) => match payload {
                [code] => Ok(Packet::Error {
                    code: *code,
                    context: None,
                }),
                [code, context] => Ok(Packet::Error {
                    code: *code,
                    context: Some(*context),
                }),
                _ => Err(RecordError::InvalidPayload),
            },
            None => Err(RecordError::UnknownType(record.record_type)),
        }
    }

    /// Returns true for swipe and acceleration packets
    pub fn is_event(&self) -> bool {
        matches!(self, Packet::Swipe { .. } | Packet::Acceleration { .. })
    }

    /// The error code of an error packet, if it is a known one
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Packet::Error { code, .. } => ErrorCode::from_byte(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_packet() {
        let record = Record::new(0x01, &[0x01, 0xC8]).unwrap();
        let packet = Packet::from_record(&record).unwrap();
        assert_eq!(
            packet,
            Packet::Swipe {
                direction: SwipeDirection::Right,
                strength: 200
            }
        );
        assert!(packet.is_event());
    }

    #[test]
    fn test_acceleration_packet() {
        let record = Record::new(0x02, &[128, 0, 255]).unwrap();
        let packet = Packet::from_record(&record).unwrap();
        assert_eq!(packet, Packet::Acceleration { x: 0, y: -128, z: 127 });
    }

    #[test]
    fn test_text_packet() {
        let record = Record::new(0x10, b"hi").unwrap();
        assert_eq!(Packet::from_record(&record).unwrap(), Packet::Text(b"hi"));
    }

    #[test]
    fn test_error_packet() {
        let record = Record::new(0x7E, &[5, 0x99]).unwrap();
        let packet = Packet::from_record(&record).unwrap();
        assert_eq!(
            packet,
            Packet::Error {
                code: 5,
                context: Some(0x99)
            }
        );
        assert_eq!(packet.error_code(), Some(ErrorCode::BadRequest));
        assert!(!packet.is_event());
    }

    #[test]
    fn test_malformed_payloads() {
        let short_swipe = Record::new(0x01, &[0x01]).unwrap();
        assert_eq!(
            Packet::from_record(&short_swipe),
            Err(RecordError::InvalidPayload)
        );

        let empty_error = Record::new(0x7E, &[]).unwrap();
        assert_eq!(
            Packet::from_record(&empty_error),
            Err(RecordError::InvalidPayload)
        );

        let unknown = Record::new(0x42, &[]).unwrap();
        assert_eq!(
            Packet::from_record(&unknown),
            Err(RecordError::UnknownType(0x42))
        );
    }
}
