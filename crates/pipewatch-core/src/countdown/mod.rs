//! Build status badge and the countdown to the next scheduled run.

pub mod clock;
pub mod scheduler;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::{CountdownScheduler, DEFAULT_TICK_INTERVAL};
pub use types::{
    BuildStatus, CountdownState, CountdownView, RUNNING_NOW, format_remaining, top_of_next_hour,
};
