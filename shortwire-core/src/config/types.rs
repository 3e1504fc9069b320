//! Configuration type definitions
//!
//! These types describe how a bridge attaches to the host bus and how the
//! input helpers classify gestures. The bridge crate loads them from TOML.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default DATA ring size in bytes
pub const DEFAULT_RING_CAPACITY: usize = 2048;

/// Smallest ring that still fits every event and error record
pub const MIN_RING_CAPACITY: usize = 5;

/// Register port assignment on the host bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PortMap {
    /// Command register (write)
    pub cmd: u8,
    /// Argument register (write)
    pub arg: u8,
    /// Status register (read)
    pub status: u8,
    /// Data register (read)
    pub data: u8,
}

impl Default for PortMap {
    fn default() -> Self {
        Self {
            cmd: 0x48,
            arg: 0x49,
            status: 0x4A,
            data: 0x4B,
        }
    }
}

impl PortMap {
    /// All four ports in register order
    pub fn ports(&self) -> [u8; 4] {
        [self.cmd, self.arg, self.status, self.data]
    }

    /// Returns the first port assigned to more than one register
    pub fn duplicate(&self) -> Option<u8> {
        let ports = self.ports();
        ports
            .iter()
            .enumerate()
            .find(|(i, port)| ports[i + 1..].contains(port))
            .map(|(_, &port)| port)
    }
}

/// Gesture and motion input tuning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputConfig {
    /// Shorter pointer travel is not a swipe (pixels)
    pub swipe_min_distance: f32,
    /// Travel that counts as a full-strength swipe (pixels)
    pub swipe_full_distance: f32,
    /// Gestures faster than this keep full strength (ms)
    pub swipe_fast_ms: f32,
    /// Minimum spacing between acceleration samples (ms)
    pub motion_interval_ms: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            swipe_min_distance: 10.0,
            swipe_full_distance: 300.0,
            swipe_fast_ms: 200.0,
            motion_interval_ms: 80,
        }
    }
}

/// Top-level bridge configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BridgeConfig {
    pub ports: PortMap,
    /// DATA ring size in bytes
    pub ring_capacity: usize,
    pub input: InputConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            ports: PortMap::default(),
            ring_capacity: DEFAULT_RING_CAPACITY,
            input: InputConfig::default(),
        }
    }
}

/// Reasons a configuration is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// Port used by more than one register
    DuplicatePort(u8),
    /// Ring smaller than [`MIN_RING_CAPACITY`]
    RingTooSmall(usize),
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValidationError::DuplicatePort(port) => {
                write!(f, "port {:#04x} assigned to more than one register", port)
            }
            ValidationError::RingTooSmall(size) => write!(
                f,
                "ring capacity {} is below the minimum of {}",
                size, MIN_RING_CAPACITY
            ),
        }
    }
}

impl BridgeConfig {
    /// Check the configuration for values the bridge cannot run with
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(port) = self.ports.duplicate() {
            return Err(ValidationError::DuplicatePort(port));
        }
        if self.ring_capacity < MIN_RING_CAPACITY {
            return Err(ValidationError::RingTooSmall(self.ring_capacity));
        }
        Ok(())
    }
}
