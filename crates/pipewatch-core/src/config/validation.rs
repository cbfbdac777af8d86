//! Configuration validation logic.

use crate::config::types::PipewatchConfig;
use crate::errors::ConfigError;

/// Validate a PipewatchConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - `countdown.tick_interval_ms`, if set, must be non-zero
/// - `bus.stream_capacity`, if set, must be non-zero
pub fn validate_config(config: &PipewatchConfig) -> Result<(), ConfigError> {
    if config.countdown.tick_interval_ms == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "countdown.tick_interval_ms must be greater than 0".to_string(),
        });
    }

    if config.bus.stream_capacity == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "bus.stream_capacity must be greater than 0".to_string(),
        });
    }

    Ok(())
}
