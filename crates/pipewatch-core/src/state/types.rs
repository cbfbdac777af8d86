use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::filters::{Branch, BuildConfiguration, JobType};

/// All user interactions that can be dispatched through the store.
///
/// Commands use owned types so they can be serialized, stored, and sent
/// across boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Pick a branch in the filter panel.
    SetBranch { branch: Branch },
    /// Pick a job type in the filter panel.
    SetJobType { job_type: JobType },
    /// Check or uncheck a build configuration.
    ToggleConfiguration { configuration: BuildConfiguration },
    /// Set or clear the start of the run date range.
    SetStartDate { date: Option<NaiveDate> },
    /// Set or clear the end of the run date range.
    SetEndDate { date: Option<NaiveDate> },
    /// Broadcast the current filters.
    ApplyFilters,
    /// Reset the filters from inside the panel and broadcast the clear.
    ClearFilters,
    /// Act as the host application and ask every filter panel to reset.
    ResetAllFilters,
    /// Manually refresh the build status and next run.
    RefreshStatus,
    /// Open or close the mobile navigation menu.
    ToggleMenu,
    /// Follow a navigation link.
    Navigate { href: String },
}
