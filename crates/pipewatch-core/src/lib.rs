//! pipewatch-core: state and signalling for a CI status dashboard
//!
//! Three sibling panels share nothing but a signal bus: a filter panel
//! that broadcasts its form values, a hero panel counting down to the
//! next scheduled run, and a header with navigation.
//!
//! # Main Entry Points
//!
//! - [`bus`] - Named-signal publish/subscribe
//! - [`filters`] - Filter form model and its apply/clear contract
//! - [`countdown`] - Build status and the self-driving countdown
//! - [`state`] - Command dispatch across all panels
//! - [`config`] - Configuration management

pub mod bus;
pub mod config;
pub mod countdown;
pub mod errors;
pub mod events;
pub mod filters;
pub mod header;
pub mod logging;
pub mod state;

// Re-export commonly used types at crate root for convenience
pub use bus::{Signal, SignalBus, SignalKind, Subscription};
pub use config::PipewatchConfig;
pub use countdown::{
    BuildStatus, Clock, CountdownScheduler, CountdownState, CountdownView, ManualClock,
    SystemClock,
};
pub use errors::{ConfigError, ParseError, PipewatchError};
pub use filters::{Branch, BuildConfiguration, FilterModel, FilterPanel, JobType};
pub use header::{HeaderState, NavItem};
pub use state::{Command, DashboardStore, DispatchError, Event, Store};

// Re-export logging initialization
pub use logging::init_logging;
