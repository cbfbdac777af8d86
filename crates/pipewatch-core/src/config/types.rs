//! Configuration type definitions.
//!
//! # Example Configuration
//!
//! ```toml
//! [countdown]
//! tick_interval_ms = 1000
//!
//! [filters]
//! diagnostics = true
//!
//! [bus]
//! stream_capacity = 64
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration loaded from TOML config files.
///
/// Every value is optional so that a project file only overrides what it
/// names; accessors fall back to the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PipewatchConfig {
    #[serde(default)]
    pub countdown: CountdownConfig,

    #[serde(default)]
    pub filters: FiltersConfig,

    #[serde(default)]
    pub bus: BusConfig,
}

/// Countdown panel settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CountdownConfig {
    /// Milliseconds between display recomputations.
    /// Default: 1000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_interval_ms: Option<u64>,
}

/// Filter panel settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FiltersConfig {
    /// Emit a trace of the branch and full filter set on every apply.
    /// Default: true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<bool>,
}

/// Signal bus settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BusConfig {
    /// Buffer size of the async signal stream.
    /// Default: 64.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_capacity: Option<usize>,
}

impl PipewatchConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(
            self.countdown
                .tick_interval_ms
                .unwrap_or(super::defaults::DEFAULT_TICK_INTERVAL_MS),
        )
    }

    pub fn filter_diagnostics(&self) -> bool {
        self.filters
            .diagnostics
            .unwrap_or(super::defaults::DEFAULT_FILTER_DIAGNOSTICS)
    }

    pub fn stream_capacity(&self) -> usize {
        self.bus
            .stream_capacity
            .unwrap_or(super::defaults::DEFAULT_STREAM_CAPACITY)
    }
}
