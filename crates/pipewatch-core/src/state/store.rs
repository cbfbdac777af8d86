use super::events::Event;
use super::types::Command;

/// Trait for dispatching dashboard commands.
///
/// Decouples command definitions from their execution so a terminal front
/// end, a test harness, or a scripted host can drive the same panels.
///
/// # Semantics
///
/// - **Ordering**: Commands execute in the order received and run to
///   completion before the next one starts.
/// - **Events**: On success, dispatch returns the events describing what
///   changed, in chronological order.
pub trait Store {
    type Error;
    fn dispatch(&mut self, cmd: Command) -> Result<Vec<Event>, Self::Error>;
}
