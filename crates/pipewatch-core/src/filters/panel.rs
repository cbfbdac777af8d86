use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::types::{Branch, BuildConfiguration, FilterModel, JobType};
use crate::bus::{Signal, SignalBus, SignalKind, Subscription};

fn lock_model(model: &Mutex<FilterModel>) -> MutexGuard<'_, FilterModel> {
    match model.lock() {
        Ok(guard) => guard,
        Err(e) => {
            warn!(
                event = "core.filters.model_lock_poisoned",
                "Mutex poisoned, resetting filters to defaults"
            );
            let mut guard = e.into_inner();
            *guard = FilterModel::default();
            guard
        }
    }
}

/// Filter form state plus its broadcast contract.
///
/// Mounting subscribes to `MainApp:ClearFilters` for the panel's whole
/// lifetime; the subscription is released when the panel is unmounted or
/// dropped, so a remounted panel never leaves a stale listener behind.
pub struct FilterPanel {
    bus: SignalBus,
    model: Arc<Mutex<FilterModel>>,
    diagnostics: bool,
    reset_subscription: Option<Subscription>,
}

impl FilterPanel {
    pub fn mount(bus: &SignalBus) -> Self {
        let model = Arc::new(Mutex::new(FilterModel::default()));

        let listener_model = Arc::clone(&model);
        let reset_subscription = bus.subscribe(SignalKind::MainAppClearFilters, move |_| {
            // Same reset as clear_filters, but never re-broadcast: the
            // originator already knows.
            *lock_model(&listener_model) = FilterModel::default();
            info!(event = "core.filters.external_reset_applied");
        });

        debug!(event = "core.filters.mounted");

        Self {
            bus: bus.clone(),
            model,
            diagnostics: true,
            reset_subscription: Some(reset_subscription),
        }
    }

    /// Enable or disable the trace emitted on every apply.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Snapshot of the current form values.
    pub fn model(&self) -> FilterModel {
        lock_model(&self.model).clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.reset_subscription.is_some()
    }

    pub fn set_branch(&mut self, branch: Branch) {
        lock_model(&self.model).branch = branch;
    }

    pub fn set_job_type(&mut self, job_type: JobType) {
        lock_model(&self.model).job_type = job_type;
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        lock_model(&self.model).start_date = date;
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        lock_model(&self.model).end_date = date;
    }

    /// Returns whether `tag` is selected after the toggle.
    pub fn toggle_configuration(&mut self, tag: BuildConfiguration) -> bool {
        lock_model(&self.model).toggle_configuration(tag)
    }

    /// Broadcast the current values on `ActionableComponent:ApplyFilters`.
    ///
    /// Any combination of values is accepted, including an empty
    /// configuration set and unset dates. Returns the snapshot that was sent.
    pub fn apply_filters(&self) -> FilterModel {
        let snapshot = self.model();

        if self.diagnostics {
            info!(
                event = "core.filters.applied",
                branch = %snapshot.branch,
                filters = ?snapshot,
                "Filters applied for branch {}",
                snapshot.branch
            );
        }

        self.bus.publish(Signal::ApplyFilters(snapshot.clone()));
        snapshot
    }

    /// Reset to the default values and broadcast
    /// `ActionableComponent:ClearFilters`.
    pub fn clear_filters(&mut self) {
        *lock_model(&self.model) = FilterModel::default();
        info!(event = "core.filters.cleared");
        self.bus.publish(Signal::ClearFilters);
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for FilterPanel {
    fn drop(&mut self) {
        if let Some(subscription) = self.reset_subscription.take() {
            subscription.unsubscribe();
            debug!(event = "core.filters.unmounted");
        }
    }
}

impl std::fmt::Debug for FilterPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPanel")
            .field("model", &self.model())
            .field("diagnostics", &self.diagnostics)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder(bus: &SignalBus, kind: SignalKind) -> (Arc<Mutex<Vec<Signal>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = bus.subscribe(kind, move |signal| {
            sink.lock().unwrap().push(signal.clone());
        });
        (seen, sub)
    }

    fn dirty_panel(bus: &SignalBus) -> FilterPanel {
        let mut panel = FilterPanel::mount(bus);
        panel.set_branch(Branch::Develop);
        panel.set_job_type(JobType::Package);
        panel.toggle_configuration(BuildConfiguration::Debug);
        panel.toggle_configuration(BuildConfiguration::Release);
        panel.set_start_date(NaiveDate::from_ymd_opt(2024, 1, 1));
        panel.set_end_date(NaiveDate::from_ymd_opt(2024, 2, 1));
        panel
    }

    #[test]
    fn test_mount_starts_from_defaults() {
        let bus = SignalBus::new();
        let panel = FilterPanel::mount(&bus);
        assert_eq!(panel.model(), FilterModel::default());
        assert!(panel.is_mounted());
        assert_eq!(bus.listener_count(SignalKind::MainAppClearFilters), 1);
    }

    #[test]
    fn test_apply_broadcasts_snapshot() {
        let bus = SignalBus::new();
        let (seen, _sub) = recorder(&bus, SignalKind::ApplyFilters);
        let mut panel = dirty_panel(&bus);

        let sent = panel.apply_filters();
        // Mutate after the broadcast; the delivered payload must not change.
        panel.set_branch(Branch::Feature);
        panel.toggle_configuration(BuildConfiguration::Debug);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        match &seen[0] {
            Signal::ApplyFilters(payload) => {
                assert_eq!(payload, &sent);
                assert_eq!(payload.branch, Branch::Develop);
                assert!(payload.configurations.contains(&BuildConfiguration::Debug));
            }
            other => panic!("unexpected signal: {other:?}"),
        }
        assert_eq!(panel.model().branch, Branch::Feature);
    }

    #[test]
    fn test_apply_accepts_empty_and_unordered_values() {
        let bus = SignalBus::new();
        let (seen, _sub) = recorder(&bus, SignalKind::ApplyFilters);
        let mut panel = FilterPanel::mount(&bus).with_diagnostics(false);
        panel.set_start_date(NaiveDate::from_ymd_opt(2024, 6, 30));
        panel.set_end_date(NaiveDate::from_ymd_opt(2024, 6, 1));

        let sent = panel.apply_filters();
        assert!(sent.configurations.is_empty());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_clear_resets_and_broadcasts() {
        let bus = SignalBus::new();
        let (seen, _sub) = recorder(&bus, SignalKind::ClearFilters);
        let mut panel = dirty_panel(&bus);

        panel.clear_filters();

        assert_eq!(panel.model(), FilterModel::default());
        assert_eq!(*seen.lock().unwrap(), vec![Signal::ClearFilters]);
    }

    #[test]
    fn test_external_reset_matches_clear_without_rebroadcast() {
        let bus = SignalBus::new();
        let (cleared, _sub) = recorder(&bus, SignalKind::ClearFilters);

        let external = dirty_panel(&bus);
        bus.publish(Signal::MainAppClearFilters);

        let mut local = dirty_panel(&bus);
        local.clear_filters();

        assert_eq!(external.model(), local.model());
        assert_eq!(external.model(), FilterModel::default());
        // Only the local clear_filters call emitted ClearFilters.
        assert_eq!(cleared.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unmount_releases_reset_subscription() {
        let bus = SignalBus::new();
        let panel = dirty_panel(&bus);
        assert_eq!(bus.listener_count(SignalKind::MainAppClearFilters), 1);

        panel.unmount();
        assert_eq!(bus.listener_count(SignalKind::MainAppClearFilters), 0);
        assert_eq!(bus.publish(Signal::MainAppClearFilters), 0);
    }

    #[test]
    fn test_remount_cycles_do_not_leak_listeners() {
        let bus = SignalBus::new();
        for _ in 0..10 {
            let panel = FilterPanel::mount(&bus);
            assert_eq!(bus.listener_count(SignalKind::MainAppClearFilters), 1);
            drop(panel);
        }
        assert_eq!(bus.listener_count(SignalKind::MainAppClearFilters), 0);
    }

    #[test]
    fn test_sibling_panels_reset_independently_of_apply() {
        let bus = SignalBus::new();
        let applies = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&applies);
        let _sub = bus.subscribe(SignalKind::ApplyFilters, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let first = dirty_panel(&bus);
        let second = dirty_panel(&bus);
        bus.publish(Signal::MainAppClearFilters);

        assert!(first.model().is_default());
        assert!(second.model().is_default());
        assert_eq!(applies.load(Ordering::SeqCst), 0);
    }
}
