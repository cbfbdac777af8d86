//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.pipewatch/config.toml` (global user preferences)
//! 3. **Project config** - `./.pipewatch/config.toml` (project-specific overrides)
//! 4. **Explicit file** - `--config <path>` (highest priority)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::config::types::{BusConfig, CountdownConfig, FiltersConfig, PipewatchConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

/// Load configuration from the user and project config files.
///
/// Missing files are not errors; unreadable or malformed ones are.
pub fn load_hierarchy() -> Result<PipewatchConfig, ConfigError> {
    load_with_override(None)
}

/// Load the hierarchy and then layer `explicit` on top.
///
/// Unlike the implicit locations, an explicit file must exist.
pub fn load_with_override(explicit: Option<&Path>) -> Result<PipewatchConfig, ConfigError> {
    let cwd = std::env::current_dir()?;
    load_from(dirs::home_dir().as_deref(), &cwd, explicit)
}

/// Hierarchy loading with the home and working directories supplied.
pub fn load_from(
    home: Option<&Path>,
    cwd: &Path,
    explicit: Option<&Path>,
) -> Result<PipewatchConfig, ConfigError> {
    let mut config = PipewatchConfig::default();

    let implicit = home
        .map(config_path_in)
        .into_iter()
        .chain(std::iter::once(config_path_in(cwd)));

    for path in implicit {
        match load_config_file(&path) {
            Ok(found) => config = merge_configs(config, found),
            Err(ConfigError::ConfigNotFound { .. }) => {
                debug!(event = "core.config.file_skipped", path = %path.display());
            }
            Err(e) => return Err(e),
        }
    }

    if let Some(path) = explicit {
        config = merge_configs(config, load_config_file(path)?);
    }

    validate_config(&config)?;
    Ok(config)
}

fn config_path_in(dir: &Path) -> PathBuf {
    dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<PipewatchConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let config = toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        message: format!("'{}': {}", path.display(), e),
    })?;

    debug!(event = "core.config.file_loaded", path = %path.display());
    Ok(config)
}

/// Merge two configurations, with `override_config` taking precedence
/// wherever it sets a value.
pub fn merge_configs(base: PipewatchConfig, override_config: PipewatchConfig) -> PipewatchConfig {
    PipewatchConfig {
        countdown: CountdownConfig {
            tick_interval_ms: override_config
                .countdown
                .tick_interval_ms
                .or(base.countdown.tick_interval_ms),
        },
        filters: FiltersConfig {
            diagnostics: override_config
                .filters
                .diagnostics
                .or(base.filters.diagnostics),
        },
        bus: BusConfig {
            stream_capacity: override_config
                .bus
                .stream_capacity
                .or(base.bus.stream_capacity),
        },
    }
}
