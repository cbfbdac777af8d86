//! # Configuration System
//!
//! Hierarchical TOML configuration for pipewatch.
//!
//! ## Configuration Hierarchy
//!
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.pipewatch/config.toml`
//! 3. **Project config** - `./.pipewatch/config.toml`
//! 4. **Explicit file** - `--config <path>`
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use pipewatch_core::config::PipewatchConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipewatchConfig::load_hierarchy()?;
//!     let period = config.tick_interval();
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

use std::path::Path;

pub use types::{BusConfig, CountdownConfig, FiltersConfig, PipewatchConfig};
pub use validation::validate_config;

impl PipewatchConfig {
    /// See [`loading::load_hierarchy`].
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// See [`loading::load_with_override`].
    pub fn load_with_override(explicit: Option<&Path>) -> Result<Self, crate::errors::ConfigError> {
        loading::load_with_override(explicit)
    }

    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
