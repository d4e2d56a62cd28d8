//! Timer configuration: autosave quiet period, undo window, polling

use crate::panel::Timing;
use serde::Deserialize;
use std::time::Duration;

/// Timers, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingConfig {
    /// Quiet period before an edit is saved
    pub autosave_ms: u64,
    /// How long a removal or deletion can be undone
    pub undo_window_ms: u64,
    /// Status and log poll interval
    pub poll_ms: u64,
    /// Clock refresh interval
    pub clock_ms: u64,
    /// Lifetime of plain notifications
    pub toast_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            autosave_ms: 1000,
            undo_window_ms: 5000,
            poll_ms: 2000,
            clock_ms: 1000,
            toast_ms: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileTiming {
    pub autosave_ms: Option<u64>,
    pub undo_window_ms: Option<u64>,
    pub poll_ms: Option<u64>,
    pub clock_ms: Option<u64>,
    pub toast_ms: Option<u64>,
}

impl TimingConfig {
    /// Create from file config with defaults. Zero intervals would spin, so
    /// they fall back to the default too.
    pub fn from_file(file: Option<FileTiming>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();
        let pick = |value: Option<u64>, default: u64| value.filter(|v| *v > 0).unwrap_or(default);

        Self {
            autosave_ms: pick(file.autosave_ms, defaults.autosave_ms),
            undo_window_ms: pick(file.undo_window_ms, defaults.undo_window_ms),
            poll_ms: pick(file.poll_ms, defaults.poll_ms),
            clock_ms: pick(file.clock_ms, defaults.clock_ms),
            toast_ms: pick(file.toast_ms, defaults.toast_ms),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    pub fn clock_interval(&self) -> Duration {
        Duration::from_millis(self.clock_ms)
    }

    /// Timers of the client state machine
    pub fn panel_timing(&self) -> Timing {
        Timing {
            autosave: Duration::from_millis(self.autosave_ms),
            undo_window: Duration::from_millis(self.undo_window_ms),
            toast_ttl: Duration::from_millis(self.toast_ms),
        }
    }
}
