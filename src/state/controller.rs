//! Session controller: the focus/break state machine
//!
//! The controller owns one [`SessionState`] and is the only thing that mutates
//! it. It knows nothing about wall-clock time; callers deliver ticks and
//! forward the [`PhaseSwitch`] events it returns.

use chrono::Utc;
use tracing::{debug, info};

use super::{
    Adjustment, DurationBounds, Phase, PhaseSwitch, SessionState, SessionStatus, BREAK_BOUNDS,
    FOCUS_BOUNDS,
};

#[derive(Debug, Clone, Default)]
pub struct SessionController {
    state: SessionState,
}

impl SessionController {
    /// Create an idle controller with the default 25/5 minute durations
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle controller with custom configured durations.
    ///
    /// Returns `None` unless both values are reachable steps within
    /// [`FOCUS_BOUNDS`] and [`BREAK_BOUNDS`].
    pub fn with_durations(focus_duration: u32, break_duration: u32) -> Option<Self> {
        if !FOCUS_BOUNDS.contains(focus_duration) || !BREAK_BOUNDS.contains(break_duration) {
            debug!(
                "Rejected durations focus={}s break={}s",
                focus_duration, break_duration
            );
            return None;
        }

        Some(Self {
            state: SessionState::new(focus_duration, break_duration),
        })
    }

    pub fn snapshot(&self) -> SessionState {
        self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    /// Start a fresh focus session when idle, otherwise toggle pause/resume
    pub fn start_or_pause(&mut self) {
        let state = &mut self.state;

        if !state.session_active {
            state.session_active = true;
            state.phase = Phase::Focus;
            state.phase_length = state.focus_duration;
            state.remaining = state.focus_duration;
            state.running = true;
            info!("Session started: focus for {}s", state.phase_length);
            return;
        }

        state.running = !state.running;
        info!(
            "Session {} with {}s remaining in {} phase",
            if state.running { "resumed" } else { "paused" },
            state.remaining,
            state.phase.as_str()
        );
    }

    /// End the session; configured durations are kept
    pub fn stop(&mut self) {
        if !self.state.session_active {
            debug!("Stop ignored, no active session");
            return;
        }

        self.state.running = false;
        self.state.session_active = false;
        info!("Session stopped");
    }

    pub fn adjust_focus(&mut self, adjustment: Adjustment) {
        let current = self.state.focus_duration;
        if let Some(next) = self.adjusted("focus", current, FOCUS_BOUNDS, adjustment) {
            self.state.focus_duration = next;
        }
    }

    pub fn adjust_break(&mut self, adjustment: Adjustment) {
        let current = self.state.break_duration;
        if let Some(next) = self.adjusted("break", current, BREAK_BOUNDS, adjustment) {
            self.state.break_duration = next;
        }
    }

    fn adjusted(
        &self,
        name: &str,
        current: u32,
        bounds: DurationBounds,
        adjustment: Adjustment,
    ) -> Option<u32> {
        if self.state.session_active {
            debug!("Ignoring {} {} during an active session", name, adjustment.as_str());
            return None;
        }

        match bounds.apply(current, adjustment) {
            Some(next) => {
                info!("{} duration set to {}s", name, next);
                Some(next)
            }
            None => {
                debug!("{} duration already at bound ({}s)", name, current);
                None
            }
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Returns the phase switch when this tick ended the current phase. The
    /// countdown never rests at zero: the tick that would reach it starts the
    /// next phase instead.
    pub fn on_tick(&mut self) -> Option<PhaseSwitch> {
        let state = &mut self.state;

        if !state.running {
            debug!("Tick ignored, session not running");
            return None;
        }

        if state.remaining > 1 {
            state.remaining -= 1;
            return None;
        }

        let from = state.phase;
        let to = from.next();
        state.phase = to;
        state.phase_length = state.duration_for(to);
        state.remaining = state.phase_length;

        info!(
            "Phase switch: {} -> {} for {}s",
            from.as_str(),
            to.as_str(),
            state.phase_length
        );

        Some(PhaseSwitch {
            from,
            to,
            phase_length: state.phase_length,
            switched_at: Utc::now(),
        })
    }
}
