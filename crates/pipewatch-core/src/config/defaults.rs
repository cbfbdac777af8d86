//! Built-in fallback values for optional configuration fields.

/// One recomputation per second.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

pub const DEFAULT_FILTER_DIAGNOSTICS: bool = true;

pub const DEFAULT_STREAM_CAPACITY: usize = crate::bus::DEFAULT_STREAM_CAPACITY;

/// Directory name used for both user and project config.
pub const CONFIG_DIR_NAME: &str = ".pipewatch";

pub const CONFIG_FILE_NAME: &str = "config.toml";
