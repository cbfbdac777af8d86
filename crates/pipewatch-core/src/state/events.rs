use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::countdown::BuildStatus;
use crate::filters::FilterModel;

/// State changes resulting from a dispatched command.
///
/// Each variant describes _what happened_, not what should happen. Only
/// successful state changes produce events; failures use the `Result`
/// error channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A form control changed; carries the resulting values.
    FiltersChanged { filters: FilterModel },
    /// Filters were broadcast on `ActionableComponent:ApplyFilters`.
    FiltersApplied { filters: FilterModel },
    /// Filters were reset from inside the panel.
    FiltersCleared,
    /// `MainApp:ClearFilters` was published to all panels.
    ResetRequested,
    /// The build status cycled and the next run was re-targeted.
    StatusRefreshed {
        status: BuildStatus,
        next_run: DateTime<Local>,
    },
    MenuToggled { open: bool },
    Navigated { href: String },
}
