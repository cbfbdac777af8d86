//! Named-signal publish/subscribe between sibling panels.

pub mod channel;
pub mod types;

pub use channel::{DEFAULT_STREAM_CAPACITY, SignalBus, Subscription};
pub use types::{Signal, SignalKind};
