//! Presentation projections over a session snapshot
//!
//! Everything here is derived per request and never stored alongside the
//! session state.

use serde::Serialize;

use crate::state::{Phase, SessionState, SessionStatus};

/// Format seconds as zero-padded `mm:ss`. Minutes do not wrap, so an hour is `60:00`.
pub fn format_mmss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Elapsed share of the current phase, 0.0 to 100.0
pub fn progress_percent(state: &SessionState) -> f64 {
    if state.phase_length == 0 {
        return 0.0;
    }
    let elapsed = state.phase_length.saturating_sub(state.remaining);
    100.0 * f64::from(elapsed) / f64::from(state.phase_length)
}

/// Heading for the active phase, e.g. "Focusing for 25:00 minutes"
pub fn session_title(state: &SessionState) -> String {
    let label = match state.phase {
        Phase::Focus => "Focusing",
        Phase::Break => "On Break",
    };
    let unit = if state.phase_length < 60 { "seconds" } else { "minutes" };
    format!("{} for {} {}", label, format_mmss(state.phase_length), unit)
}

/// Which controls a client should offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    /// Duration +/- buttons
    pub adjust_enabled: bool,
    pub stop_enabled: bool,
    /// What the play/pause button does next: "play" or "pause"
    pub play_pause_action: &'static str,
}

impl Controls {
    pub fn for_state(state: &SessionState) -> Self {
        Self {
            adjust_enabled: !state.session_active,
            stop_enabled: state.session_active,
            play_pause_action: if state.running { "pause" } else { "play" },
        }
    }
}

/// Snapshot plus every derived display value
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub state: SessionState,
    pub status: SessionStatus,
    pub paused: bool,
    pub focus_label: String,
    pub break_label: String,
    pub remaining_label: String,
    pub phase_length_label: String,
    pub title: String,
    pub progress_percent: f64,
    pub controls: Controls,
}

impl From<SessionState> for SessionView {
    fn from(state: SessionState) -> Self {
        Self {
            status: state.status(),
            paused: state.status() == SessionStatus::Paused,
            focus_label: format_mmss(state.focus_duration),
            break_label: format_mmss(state.break_duration),
            remaining_label: format_mmss(state.remaining),
            phase_length_label: format_mmss(state.phase_length),
            title: session_title(&state),
            progress_percent: progress_percent(&state),
            controls: Controls::for_state(&state),
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SessionController;

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(59), "00:59");
        assert_eq!(format_mmss(300), "05:00");
        assert_eq!(format_mmss(1499), "24:59");
        assert_eq!(format_mmss(3600), "60:00");
    }

    #[test]
    fn test_progress_tracks_elapsed_time() {
        let mut c = SessionController::with_durations(300, 60).unwrap();
        c.start_or_pause();
        assert_eq!(progress_percent(&c.snapshot()), 0.0);

        for _ in 0..150 {
            c.on_tick();
        }
        assert!((progress_percent(&c.snapshot()) - 50.0).abs() < f64::EPSILON);

        let empty = SessionState { phase_length: 0, remaining: 0, ..SessionState::default() };
        assert_eq!(progress_percent(&empty), 0.0);
    }

    #[test]
    fn test_title_wording() {
        let state = SessionState::default();
        assert_eq!(session_title(&state), "Focusing for 25:00 minutes");

        let on_break = SessionState { phase: Phase::Break, phase_length: 60, ..state };
        assert_eq!(session_title(&on_break), "On Break for 01:00 minutes");

        let short = SessionState { phase_length: 45, ..state };
        assert_eq!(session_title(&short), "Focusing for 00:45 seconds");
    }

    #[test]
    fn test_controls_follow_activity() {
        let mut c = SessionController::new();
        let idle = Controls::for_state(&c.snapshot());
        assert!(idle.adjust_enabled);
        assert!(!idle.stop_enabled);
        assert_eq!(idle.play_pause_action, "play");

        c.start_or_pause();
        let running = Controls::for_state(&c.snapshot());
        assert!(!running.adjust_enabled);
        assert!(running.stop_enabled);
        assert_eq!(running.play_pause_action, "pause");

        c.start_or_pause();
        let view = SessionView::from(c.snapshot());
        assert!(view.paused);
        assert_eq!(view.controls.play_pause_action, "play");
    }
}
