use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::types::{CountdownState, CountdownView};

/// Recompute cadence of the countdown display.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

struct Shared {
    state: Mutex<CountdownState>,
    clock: Arc<dyn Clock>,
    view_tx: watch::Sender<CountdownView>,
    ticks: AtomicU64,
    /// Set under the state lock on teardown.
    stopped: AtomicBool,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, CountdownState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(e) => {
                warn!(
                    event = "core.countdown.state_lock_poisoned",
                    "Mutex poisoned, continuing with last known countdown state"
                );
                e.into_inner()
            }
        }
    }

    /// Returns `None` once the scheduler has been torn down.
    fn tick(&self) -> Option<CountdownView> {
        let now = self.clock.now();
        let mut state = self.state();
        if self.stopped.load(Ordering::SeqCst) {
            return None;
        }
        state.tick(now);
        let view = state.view();
        self.ticks.fetch_add(1, Ordering::SeqCst);
        // send_replace keeps the latest view even with no receivers.
        self.view_tx.send_replace(view.clone());
        Some(view)
    }

    /// After this returns no tick can update the state or notify watchers.
    fn stop(&self) {
        let _state = self.state();
        self.stopped.store(true, Ordering::SeqCst);
    }
}

/// Self-driving countdown to the next scheduled CI run.
///
/// Mounting spawns a tokio task that recomputes the display every period.
/// The task handle is owned by the scheduler and aborted on
/// [`unmount`](Self::unmount) or drop, so nothing recomputes after
/// teardown regardless of how the owner goes away.
pub struct CountdownScheduler {
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl CountdownScheduler {
    /// Create the countdown state and start ticking.
    ///
    /// The display is computed once immediately, then every `period`.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(clock: Arc<dyn Clock>, period: Duration) -> Self {
        let period = if period.is_zero() {
            warn!(
                event = "core.countdown.zero_period_clamped",
                "Tick period must be non-zero, using default"
            );
            DEFAULT_TICK_INTERVAL
        } else {
            period
        };

        let state = CountdownState::new(clock.now());
        let (view_tx, _) = watch::channel(state.view());
        let shared = Arc::new(Shared {
            state: Mutex::new(state),
            clock,
            view_tx,
            ticks: AtomicU64::new(1),
            stopped: AtomicBool::new(false),
        });

        let task = tokio::spawn(run_ticker(Arc::clone(&shared), period));

        info!(
            event = "core.countdown.mounted",
            period_ms = period.as_millis() as u64
        );

        Self {
            shared,
            task: Some(task),
        }
    }

    /// Latest derived view.
    pub fn view(&self) -> CountdownView {
        self.shared.state().view()
    }

    /// Receiver notified after every tick and refresh.
    pub fn watch(&self) -> watch::Receiver<CountdownView> {
        self.shared.view_tx.subscribe()
    }

    /// Number of recomputations so far, including the one at mount.
    pub fn tick_count(&self) -> u64 {
        self.shared.ticks.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Manual refresh: cycle the build status and re-target the next hour
    /// from now, then recompute the display without waiting for the timer.
    pub fn refresh(&self) -> CountdownView {
        let now = self.shared.clock.now();
        let view = {
            let mut state = self.shared.state();
            state.refresh(now);
            let view = state.view();
            self.shared.view_tx.send_replace(view.clone());
            view
        };

        info!(
            event = "core.countdown.status_refreshed",
            status = %view.build_status,
            next_run = %view.next_run
        );
        view
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for CountdownScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            // A tick may be mid-flight on another worker; abort alone
            // would let it finish.
            self.shared.stop();
            task.abort();
            debug!(
                event = "core.countdown.unmounted",
                ticks = self.shared.ticks.load(Ordering::SeqCst)
            );
        }
    }
}

impl std::fmt::Debug for CountdownScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownScheduler")
            .field("view", &self.view())
            .field("ticks", &self.tick_count())
            .field("running", &self.is_running())
            .finish()
    }
}

async fn run_ticker(shared: Arc<Shared>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; mount already computed it.
    interval.tick().await;

    loop {
        interval.tick().await;
        let Some(view) = shared.tick() else {
            break;
        };
        debug!(
            event = "core.countdown.ticked",
            countdown = %view.countdown_text
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::clock::ManualClock;
    use crate::countdown::types::{BuildStatus, RUNNING_NOW};
    use chrono::{DateTime, Local, TimeDelta, TimeZone};

    fn local(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 1, 15, h, m, s)
            .single()
            .expect("unambiguous local time")
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_computes_immediately() {
        let clock = Arc::new(ManualClock::new(local(10, 0, 0)));
        let scheduler = CountdownScheduler::mount(clock, DEFAULT_TICK_INTERVAL);

        let view = scheduler.view();
        assert_eq!(view.build_status, BuildStatus::Success);
        assert_eq!(view.countdown_text, "01:00:00");
        assert_eq!(scheduler.tick_count(), 1);
        assert!(scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_follow_the_clock() {
        let clock = Arc::new(ManualClock::new(local(10, 0, 0)));
        let scheduler = CountdownScheduler::mount(clock.clone(), DEFAULT_TICK_INTERVAL);
        let mut rx = scheduler.watch();

        for expected in ["00:59:59", "00:59:58", "00:59:57"] {
            clock.advance(TimeDelta::seconds(1));
            rx.changed().await.unwrap();
            assert_eq!(rx.borrow_and_update().countdown_text, expected);
        }
        assert_eq!(scheduler.tick_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaching_target_shows_running_now() {
        let clock = Arc::new(ManualClock::new(local(10, 59, 59)));
        let scheduler = CountdownScheduler::mount(clock.clone(), DEFAULT_TICK_INTERVAL);
        let mut rx = scheduler.watch();
        assert_eq!(scheduler.view().countdown_text, "00:00:01");

        clock.advance(TimeDelta::seconds(1));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().countdown_text, RUNNING_NOW);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_short_circuits_timer() {
        let clock = Arc::new(ManualClock::new(local(10, 45, 0)));
        let scheduler = CountdownScheduler::mount(clock.clone(), DEFAULT_TICK_INTERVAL);
        let mut rx = scheduler.watch();

        clock.set(local(12, 10, 0));
        let view = scheduler.refresh();
        assert_eq!(view.build_status, BuildStatus::Warning);
        assert_eq!(view.next_run, local(13, 0, 0));
        assert_eq!(view.countdown_text, "00:50:00");

        // Observers see the refresh before any timer tick happens.
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), view);
        assert_eq!(scheduler.tick_count(), 1);

        assert_eq!(scheduler.refresh().build_status, BuildStatus::Error);
        assert_eq!(scheduler.refresh().build_status, BuildStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_stops_ticking() {
        let clock = Arc::new(ManualClock::new(local(10, 0, 0)));
        let scheduler = CountdownScheduler::mount(clock, DEFAULT_TICK_INTERVAL);
        let mut rx = scheduler.watch();
        rx.changed().await.unwrap();
        rx.changed().await.unwrap();

        let shared = Arc::clone(&scheduler.shared);
        let ticks_at_unmount = scheduler.tick_count();
        scheduler.unmount();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(shared.ticks.load(Ordering::SeqCst), ticks_at_unmount);
    }

    /// Clock that stalls inside `now()` once armed, so a tick can be caught
    /// in flight.
    struct StallingClock {
        inner: ManualClock,
        stall: AtomicBool,
        entered: AtomicBool,
    }

    impl Clock for StallingClock {
        fn now(&self) -> DateTime<Local> {
            if self.stall.load(Ordering::SeqCst) {
                self.entered.store(true, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(300));
            }
            self.inner.now()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_tick_in_flight_at_unmount_is_discarded() {
        let clock = Arc::new(StallingClock {
            inner: ManualClock::new(local(10, 0, 0)),
            stall: AtomicBool::new(false),
            entered: AtomicBool::new(false),
        });
        let scheduler = CountdownScheduler::mount(clock.clone(), Duration::from_millis(50));
        let shared = Arc::clone(&scheduler.shared);
        let mut rx = scheduler.watch();

        clock.stall.store(true, Ordering::SeqCst);
        while !clock.entered.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        rx.borrow_and_update();

        let ticks_at_unmount = scheduler.tick_count();
        scheduler.unmount();

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(shared.ticks.load(Ordering::SeqCst), ticks_at_unmount);
        assert!(!rx.has_changed().unwrap_or(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_mount_unmount_cycles() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(local(10, 0, 0)));
        let mut handles = Vec::new();
        for _ in 0..50 {
            let scheduler = CountdownScheduler::mount(Arc::clone(&clock), DEFAULT_TICK_INTERVAL);
            handles.push(Arc::clone(&scheduler.shared));
            drop(scheduler);
        }

        tokio::time::sleep(Duration::from_secs(5)).await;
        for shared in handles {
            assert_eq!(shared.ticks.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_is_clamped() {
        let clock = Arc::new(ManualClock::new(local(10, 0, 0)));
        let scheduler = CountdownScheduler::mount(clock, Duration::ZERO);
        let mut rx = scheduler.watch();
        rx.changed().await.unwrap();
        assert_eq!(scheduler.tick_count(), 2);
    }
}
