//! Session state structure and duration bounds

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Adjustment, Phase};

/// Default focus length: 25 minutes
pub const DEFAULT_FOCUS_SECONDS: u32 = 25 * 60;
/// Default break length: 5 minutes
pub const DEFAULT_BREAK_SECONDS: u32 = 5 * 60;

/// Bounds and step size for one configurable duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationBounds {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

/// Focus durations: 5 to 60 minutes in 5 minute steps
pub const FOCUS_BOUNDS: DurationBounds = DurationBounds {
    min: 5 * 60,
    max: 60 * 60,
    step: 5 * 60,
};

/// Break durations: 1 to 15 minutes in 1 minute steps
pub const BREAK_BOUNDS: DurationBounds = DurationBounds {
    min: 60,
    max: 15 * 60,
    step: 60,
};

impl DurationBounds {
    pub fn range(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }

    /// Whether `seconds` is one of the values reachable by stepping within bounds
    pub fn contains(&self, seconds: u32) -> bool {
        self.range().contains(&seconds) && seconds % self.step == 0
    }

    /// Apply one step in the given direction, or `None` if the result leaves the bounds
    pub fn apply(&self, current: u32, adjustment: Adjustment) -> Option<u32> {
        let next = match adjustment {
            Adjustment::Increase => current.checked_add(self.step)?,
            Adjustment::Decrease => current.checked_sub(self.step)?,
        };
        self.range().contains(&next).then_some(next)
    }
}

/// Snapshot of the session timer, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Configured focus length, editable only while idle
    pub focus_duration: u32,
    /// Configured break length, editable only while idle
    pub break_duration: u32,
    /// Current phase, or the last one that was active
    pub phase: Phase,
    /// Length of the current phase, captured when it began
    pub phase_length: u32,
    /// Seconds left in the current phase
    pub remaining: u32,
    pub session_active: bool,
    pub running: bool,
}

impl SessionState {
    /// Create an idle state with the given configured durations
    pub(crate) fn new(focus_duration: u32, break_duration: u32) -> Self {
        Self {
            focus_duration,
            break_duration,
            phase: Phase::Focus,
            phase_length: focus_duration,
            remaining: focus_duration,
            session_active: false,
            running: false,
        }
    }

    /// Configured duration for the given phase
    pub fn duration_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_duration,
            Phase::Break => self.break_duration,
        }
    }

    pub fn status(&self) -> SessionStatus {
        match (self.session_active, self.running) {
            (false, _) => SessionStatus::Idle,
            (true, true) => SessionStatus::Running,
            (true, false) => SessionStatus::Paused,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_SECONDS, DEFAULT_BREAK_SECONDS)
    }
}

/// Coarse lifecycle state derived from `session_active` and `running`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Running => "running",
            SessionStatus::Paused => "paused",
        }
    }
}

/// Alarm notification emitted once per automatic phase switch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseSwitch {
    pub from: Phase,
    pub to: Phase,
    /// Length of the phase that just began
    pub phase_length: u32,
    pub switched_at: DateTime<Utc>,
}
