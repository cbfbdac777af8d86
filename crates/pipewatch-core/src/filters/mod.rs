//! Pipeline filter panel: form model and its apply/clear signals.

pub mod panel;
pub mod types;

pub use panel::FilterPanel;
pub use types::{Branch, BuildConfiguration, FilterModel, JobType};
