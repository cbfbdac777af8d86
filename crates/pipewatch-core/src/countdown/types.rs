use std::fmt;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// Display text once the scheduled run time has been reached.
pub const RUNNING_NOW: &str = "Running now…";

/// Status of the most recent build, cycled by manual refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    #[default]
    Success,
    Warning,
    Error,
}

impl BuildStatus {
    /// Round-robin successor: success → warning → error → success.
    pub fn next(self) -> Self {
        match self {
            BuildStatus::Success => BuildStatus::Warning,
            BuildStatus::Warning => BuildStatus::Error,
            BuildStatus::Error => BuildStatus::Success,
        }
    }

    /// Badge text shown next to the countdown.
    pub fn label(&self) -> &'static str {
        match self {
            BuildStatus::Success => "Build Success",
            BuildStatus::Warning => "Build Unstable",
            BuildStatus::Error => "Build Failed",
        }
    }

    /// Badge colour family.
    pub fn tone(&self) -> &'static str {
        match self {
            BuildStatus::Success => "green",
            BuildStatus::Warning => "amber",
            BuildStatus::Error => "red",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStatus::Success => "success",
            BuildStatus::Warning => "warning",
            BuildStatus::Error => "error",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The next whole hour strictly after `now`, in the same timezone.
pub fn top_of_next_hour<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let into_hour = TimeDelta::seconds(i64::from(now.minute() * 60 + now.second()))
        + TimeDelta::nanoseconds(i64::from(now.nanosecond()));
    now.clone() - into_hour + TimeDelta::hours(1)
}

/// Format time left as zero-padded `HH:MM:SS`.
///
/// Sub-second precision is discarded and hours do not wrap into days.
/// Zero or negative time yields [`RUNNING_NOW`].
pub fn format_remaining(remaining: TimeDelta) -> String {
    if remaining <= TimeDelta::zero() {
        return RUNNING_NOW.to_string();
    }
    let total = remaining.num_seconds();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Canonical countdown state: build status, target time, and the clock
/// reading of the last recomputation.
///
/// The countdown text is always derived from these values and never
/// stored on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownState {
    build_status: BuildStatus,
    next_run: DateTime<Local>,
    observed_at: DateTime<Local>,
}

impl CountdownState {
    /// Fresh state: `success`, next run at the top of the next hour.
    pub fn new(now: DateTime<Local>) -> Self {
        Self::scheduled(top_of_next_hour(&now), now)
    }

    /// State targeting an explicit `next_run`.
    pub fn scheduled(next_run: DateTime<Local>, now: DateTime<Local>) -> Self {
        Self {
            build_status: BuildStatus::default(),
            next_run,
            observed_at: now,
        }
    }

    pub fn build_status(&self) -> BuildStatus {
        self.build_status
    }

    pub fn next_run(&self) -> DateTime<Local> {
        self.next_run
    }

    pub fn observed_at(&self) -> DateTime<Local> {
        self.observed_at
    }

    /// Record a clock reading; the display follows from it.
    pub fn tick(&mut self, now: DateTime<Local>) {
        self.observed_at = now;
    }

    /// Cycle the status and re-target the top of the hour after `now`.
    ///
    /// The previous `next_run` is discarded, not extended.
    pub fn refresh(&mut self, now: DateTime<Local>) {
        self.build_status = self.build_status.next();
        self.next_run = top_of_next_hour(&now);
        self.observed_at = now;
    }

    pub fn remaining(&self) -> TimeDelta {
        self.next_run.signed_duration_since(self.observed_at)
    }

    pub fn countdown_text(&self) -> String {
        format_remaining(self.remaining())
    }

    pub fn view(&self) -> CountdownView {
        CountdownView {
            build_status: self.build_status,
            label: self.build_status.label().to_string(),
            tone: self.build_status.tone().to_string(),
            next_run: self.next_run,
            countdown_text: self.countdown_text(),
        }
    }
}

/// Render-ready projection of [`CountdownState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownView {
    pub build_status: BuildStatus,
    pub label: String,
    pub tone: String,
    pub next_run: DateTime<Local>,
    pub countdown_text: String,
}
