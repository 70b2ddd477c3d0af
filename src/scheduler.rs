//! Self-rescheduling poll loop driving the monitor.
//!
//! Each cycle waits for the interval, then runs one capture to completion,
//! then waits again. A slow capture pushes the next cycle out instead of
//! overlapping it, so at most one capture is ever in flight.

use crate::clipboard::ClipboardSource;
use crate::config::{IntervalSetting, PluginEnv};
use crate::monitor::Monitor;
use std::thread;
use std::time::Duration;
use tracing::error;

/// Default poll interval.
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Default poll interval on Linux, where clipboard reads are materially
/// slower.
pub const DEFAULT_INTERVAL_LINUX_MS: u64 = 3000;

/// Smallest accepted interval, to bound CPU usage.
pub const MINIMUM_INTERVAL_MS: u64 = 250;

/// Platform default interval.
pub fn default_interval() -> Duration {
    if cfg!(target_os = "linux") {
        Duration::from_millis(DEFAULT_INTERVAL_LINUX_MS)
    } else {
        Duration::from_millis(DEFAULT_INTERVAL_MS)
    }
}

/// Resolve a user-supplied interval setting.
///
/// Unparseable values fall back to the platform default; parsed values
/// below the minimum are clamped up to it. Never an error.
pub fn resolve_interval(setting: Option<&IntervalSetting>) -> Duration {
    let millis = match setting {
        None => return default_interval(),
        Some(IntervalSetting::Millis(n)) => *n,
        Some(IntervalSetting::Text(s)) => match s.trim().parse::<i64>() {
            Ok(n) => n,
            Err(_) => return default_interval(),
        },
    };

    if millis < MINIMUM_INTERVAL_MS as i64 {
        Duration::from_millis(MINIMUM_INTERVAL_MS)
    } else {
        Duration::from_millis(millis as u64)
    }
}

/// Where the loop currently is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollState {
    Waiting,
    Capturing,
}

/// Drives the monitor on a fixed cadence.
///
/// The loop has no internal stop condition; it runs until the host tears
/// the plugin down. A failure in one cycle is logged and never prevents the
/// next cycle from being scheduled.
pub struct Poller<C: ClipboardSource> {
    monitor: Monitor<C>,
    interval: Duration,
    ignore_images: bool,
    state: PollState,
}

impl<C: ClipboardSource> Poller<C> {
    /// Build a poller with the interval resolved from the environment.
    pub fn new(monitor: Monitor<C>, env: &PluginEnv) -> Self {
        Self::with_interval(
            monitor,
            resolve_interval(env.update_interval.as_ref()),
            env.ignore_images,
        )
    }

    /// Build a poller with an already-resolved interval.
    pub fn with_interval(monitor: Monitor<C>, interval: Duration, ignore_images: bool) -> Self {
        Self {
            monitor,
            interval,
            ignore_images,
            state: PollState::Waiting,
        }
    }

    /// Resolved cycle interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Current loop state.
    pub fn state(&self) -> PollState {
        self.state
    }

    /// One poll tick: wait, capture, return to waiting.
    ///
    /// Capture errors are swallowed here so the chain never halts on a
    /// single bad cycle; clipboard state is re-evaluated next tick anyway.
    pub fn run_once(&mut self) {
        thread::sleep(self.interval);

        self.state = PollState::Capturing;
        if let Err(err) = self.monitor.capture(self.ignore_images) {
            error!(%err, "capture cycle failed");
        }
        self.state = PollState::Waiting;
    }

    /// Run the loop indefinitely.
    pub fn run(mut self) -> ! {
        loop {
            self.run_once();
        }
    }
}
