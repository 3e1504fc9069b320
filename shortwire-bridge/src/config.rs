//! Configuration loading
//!
//! Reads a [`BridgeConfig`] from TOML. Missing keys take their defaults:
//!
//! ```toml
//! ring_capacity = 2048
//!
//! [ports]
//! cmd = 0x48
//! arg = 0x49
//! status = 0x4A
//! data = 0x4B
//!
//! [input]
//! swipe_min_distance = 10.0
//! motion_interval_ms = 80
//! ```

use log::info;

use shortwire_core::config::{BridgeConfig, ValidationError};

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// TOML syntax or type error
    Parse(toml::de::Error),
    /// Well-formed but unusable values
    Invalid(ValidationError),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<ValidationError> for ConfigError {
    fn from(e: ValidationError) -> Self {
        ConfigError::Invalid(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "invalid configuration file: {}", e),
            ConfigError::Invalid(e) => write!(f, "invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

/// Parse and validate a TOML configuration
pub fn load_config(input: &str) -> Result<BridgeConfig, ConfigError> {
    let config: BridgeConfig = toml::from_str(input)?;
    config.validate()?;
    info!(
        "Loaded configuration: ports {:#04x}-{:#04x}, ring {} bytes",
        config.ports.cmd, config.ports.data, config.ring_capacity
    );
    Ok(config)
}
