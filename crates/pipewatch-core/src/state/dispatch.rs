use std::sync::Arc;

use tracing::{debug, error, info};

use crate::bus::{Signal, SignalBus};
use crate::config::PipewatchConfig;
use crate::countdown::{Clock, CountdownScheduler};
use crate::filters::FilterPanel;
use crate::header::HeaderState;
use crate::state::errors::DispatchError;
use crate::state::events::Event;
use crate::state::store::Store;
use crate::state::types::Command;

/// The three dashboard panels mounted on one shared bus.
///
/// The store owns the bus and every panel; dropping it unmounts the
/// panels, which releases the filter subscription and stops the
/// countdown timer.
pub struct DashboardStore {
    bus: SignalBus,
    filters: FilterPanel,
    countdown: CountdownScheduler,
    header: HeaderState,
}

impl DashboardStore {
    /// Mount all panels.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime (the countdown spawns
    /// its ticker task).
    pub fn mount(config: &PipewatchConfig, clock: Arc<dyn Clock>) -> Self {
        let bus = SignalBus::with_stream_capacity(config.stream_capacity());
        Self::mount_on(bus, config, clock)
    }

    /// Mount all panels on an existing bus.
    pub fn mount_on(bus: SignalBus, config: &PipewatchConfig, clock: Arc<dyn Clock>) -> Self {
        let filters = FilterPanel::mount(&bus).with_diagnostics(config.filter_diagnostics());
        let countdown = CountdownScheduler::mount(clock, config.tick_interval());

        info!(event = "core.state.dashboard_mounted");

        Self {
            bus,
            filters,
            countdown,
            header: HeaderState::new(),
        }
    }

    pub fn bus(&self) -> &SignalBus {
        &self.bus
    }

    pub fn filters(&self) -> &FilterPanel {
        &self.filters
    }

    pub fn countdown(&self) -> &CountdownScheduler {
        &self.countdown
    }

    pub fn header(&self) -> &HeaderState {
        &self.header
    }

    fn filters_changed(&self) -> Vec<Event> {
        vec![Event::FiltersChanged {
            filters: self.filters.model(),
        }]
    }
}

impl Store for DashboardStore {
    type Error = DispatchError;

    fn dispatch(&mut self, cmd: Command) -> Result<Vec<Event>, DispatchError> {
        debug!(event = "core.state.dispatch_started", command = ?cmd);

        let result = match cmd {
            Command::SetBranch { branch } => {
                self.filters.set_branch(branch);
                Ok(self.filters_changed())
            }
            Command::SetJobType { job_type } => {
                self.filters.set_job_type(job_type);
                Ok(self.filters_changed())
            }
            Command::ToggleConfiguration { configuration } => {
                self.filters.toggle_configuration(configuration);
                Ok(self.filters_changed())
            }
            Command::SetStartDate { date } => {
                self.filters.set_start_date(date);
                Ok(self.filters_changed())
            }
            Command::SetEndDate { date } => {
                self.filters.set_end_date(date);
                Ok(self.filters_changed())
            }
            Command::ApplyFilters => {
                let filters = self.filters.apply_filters();
                Ok(vec![Event::FiltersApplied { filters }])
            }
            Command::ClearFilters => {
                self.filters.clear_filters();
                Ok(vec![Event::FiltersCleared])
            }
            Command::ResetAllFilters => {
                self.bus.publish(Signal::MainAppClearFilters);
                Ok(vec![Event::ResetRequested])
            }
            Command::RefreshStatus => {
                let view = self.countdown.refresh();
                Ok(vec![Event::StatusRefreshed {
                    status: view.build_status,
                    next_run: view.next_run,
                }])
            }
            Command::ToggleMenu => {
                let open = self.header.toggle_menu();
                Ok(vec![Event::MenuToggled { open }])
            }
            Command::Navigate { href } => match self.header.navigate(&href) {
                Some(item) => Ok(vec![Event::Navigated {
                    href: item.href.to_string(),
                }]),
                None => Err(DispatchError::UnknownNavTarget { href }),
            },
        };

        match &result {
            Ok(events) => info!(
                event = "core.state.dispatch_completed",
                event_count = events.len()
            ),
            Err(e) => error!(event = "core.state.dispatch_failed", error = %e),
        }

        result
    }
}
