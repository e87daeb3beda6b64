//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use super::{Adjustment, PhaseSwitch, SessionController, SessionState};

/// Arming signal for the ticker task.
///
/// `epoch` grows every time the session goes from not running to running, so
/// a pause quickly followed by a resume still restarts the cadence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunGate {
    pub running: bool,
    pub epoch: u64,
}

/// Shared handle around the single session controller
#[derive(Debug)]
pub struct AppState {
    /// The session state machine; every command and tick goes through this lock
    pub controller: Arc<Mutex<SessionController>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Alarm notifications, one per phase switch
    pub alarm_tx: broadcast::Sender<PhaseSwitch>,
    /// Latest session snapshot
    pub session_update_tx: watch::Sender<SessionState>,
    /// Arms and disarms the ticker
    pub run_gate_tx: watch::Sender<RunGate>,
}

impl AppState {
    /// Create a new AppState with an idle controller
    pub fn new(port: u16, host: String, controller: SessionController) -> Self {
        let (alarm_tx, _) = broadcast::channel(16);
        let (session_update_tx, _) = watch::channel(controller.snapshot());
        let (run_gate_tx, _) = watch::channel(RunGate::default());

        Self {
            controller: Arc::new(Mutex::new(controller)),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            alarm_tx,
            session_update_tx,
            run_gate_tx,
        }
    }

    /// Run an operation against the controller and publish the resulting state.
    ///
    /// Snapshot and run gate are published before the lock is released so
    /// watchers never see updates out of order.
    fn apply<F, R>(&self, command: F) -> Result<(SessionState, R), String>
    where
        F: FnOnce(&mut SessionController) -> R,
    {
        let mut controller = self.controller.lock()
            .map_err(|e| format!("Failed to lock session state: {}", e))?;

        let was_running = controller.snapshot().running;
        let output = command(&mut *controller);
        let new_state = controller.snapshot();

        self.session_update_tx.send_replace(new_state);
        if was_running != new_state.running {
            self.run_gate_tx.send_modify(|gate| {
                gate.running = new_state.running;
                if new_state.running {
                    gate.epoch += 1;
                }
            });
            debug!("Run gate updated: running={}", new_state.running);
        }
        drop(controller); // Release the lock early

        Ok((new_state, output))
    }

    /// Run a user command and record it as the last action
    fn command<F>(&self, action: &str, command: F) -> Result<SessionState, String>
    where
        F: FnOnce(&mut SessionController),
    {
        let (new_state, ()) = self.apply(command)?;

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(new_state)
    }

    /// Start a session, or pause/resume the active one
    pub fn start_or_pause(&self) -> Result<SessionState, String> {
        self.command("start-pause", SessionController::start_or_pause)
    }

    /// Stop the active session
    pub fn stop(&self) -> Result<SessionState, String> {
        self.command("stop", SessionController::stop)
    }

    /// Change the configured focus duration by one step
    pub fn adjust_focus(&self, adjustment: Adjustment) -> Result<SessionState, String> {
        let action = format!("focus-{}", adjustment.as_str());
        self.command(&action, |c| c.adjust_focus(adjustment))
    }

    /// Change the configured break duration by one step
    pub fn adjust_break(&self, adjustment: Adjustment) -> Result<SessionState, String> {
        let action = format!("break-{}", adjustment.as_str());
        self.command(&action, |c| c.adjust_break(adjustment))
    }

    /// Deliver one second to the countdown and broadcast any phase switch
    pub fn tick(&self) -> Result<Option<PhaseSwitch>, String> {
        let (_, switch) = self.apply(SessionController::on_tick)?;

        if let Some(switch) = &switch {
            info!("Alarm: {} phase started", switch.to.as_str());
            if self.alarm_tx.send(switch.clone()).is_err() {
                debug!("No alarm subscribers, notification dropped");
            }
        }

        Ok(switch)
    }

    /// Get current session state
    pub fn get_session_state(&self) -> Result<SessionState, String> {
        self.controller.lock()
            .map(|controller| controller.snapshot())
            .map_err(|e| format!("Failed to lock session state: {}", e))
    }

    /// Subscribe to alarm notifications
    pub fn subscribe_alarms(&self) -> broadcast::Receiver<PhaseSwitch> {
        self.alarm_tx.subscribe()
    }

    /// Watch the ticker arming signal
    pub fn watch_run_gate(&self) -> watch::Receiver<RunGate> {
        self.run_gate_tx.subscribe()
    }

    /// Watch session snapshots
    pub fn watch_session(&self) -> watch::Receiver<SessionState> {
        self.session_update_tx.subscribe()
    }

    /// Latest published snapshot, read without taking the controller lock
    pub fn current_session(&self) -> SessionState {
        *self.session_update_tx.borrow()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Phase;

    fn app(focus: u32, brk: u32) -> AppState {
        let controller = SessionController::with_durations(focus, brk).unwrap();
        AppState::new(0, "127.0.0.1".to_string(), controller)
    }

    #[test]
    fn test_commands_record_last_action() {
        let state = app(1500, 300);
        assert_eq!(state.get_last_action().0, None);

        state.adjust_break(Adjustment::Increase).unwrap();
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("break-increase"));
        assert!(time.is_some());

        state.start_or_pause().unwrap();
        assert_eq!(state.get_last_action().0.as_deref(), Some("start-pause"));
    }

    #[test]
    fn test_run_gate_epoch_grows_on_each_resume() {
        let state = app(1500, 300);
        let gate = state.watch_run_gate();
        assert_eq!(*gate.borrow(), RunGate { running: false, epoch: 0 });

        state.start_or_pause().unwrap();
        assert_eq!(*gate.borrow(), RunGate { running: true, epoch: 1 });

        state.start_or_pause().unwrap();
        assert_eq!(*gate.borrow(), RunGate { running: false, epoch: 1 });

        state.start_or_pause().unwrap();
        assert_eq!(*gate.borrow(), RunGate { running: true, epoch: 2 });

        state.stop().unwrap();
        assert_eq!(*gate.borrow(), RunGate { running: false, epoch: 2 });
    }

    #[test]
    fn test_adjustment_does_not_touch_run_gate() {
        let state = app(1500, 300);
        let gate = state.watch_run_gate();
        state.adjust_focus(Adjustment::Increase).unwrap();
        assert!(!gate.has_changed().unwrap());
    }

    #[test]
    fn test_tick_broadcasts_phase_switch() {
        let state = app(300, 60);
        let mut alarms = state.subscribe_alarms();
        state.start_or_pause().unwrap();

        for _ in 0..299 {
            assert!(state.tick().unwrap().is_none());
        }
        assert!(alarms.try_recv().is_err());

        let switch = state.tick().unwrap().expect("phase switch");
        assert_eq!(switch.to, Phase::Break);

        let received = alarms.try_recv().unwrap();
        assert_eq!(received, switch);
        assert!(alarms.try_recv().is_err());

        let snapshot = *state.watch_session().borrow();
        assert_eq!(snapshot.phase, Phase::Break);
        assert_eq!(snapshot.remaining, 60);
    }

    #[test]
    fn test_published_snapshot_follows_every_operation() {
        let state = app(300, 60);
        assert_eq!(state.current_session(), state.get_session_state().unwrap());

        state.adjust_focus(Adjustment::Increase).unwrap();
        assert_eq!(state.current_session().focus_duration, 600);

        state.start_or_pause().unwrap();
        state.tick().unwrap();
        let published = state.current_session();
        assert_eq!(published, state.get_session_state().unwrap());
        assert_eq!(published.remaining, 599);
        assert!(published.running);
    }

    #[test]
    fn test_tick_without_subscribers_still_switches() {
        let state = app(300, 60);
        state.start_or_pause().unwrap();
        for _ in 0..300 {
            state.tick().unwrap();
        }
        let s = state.get_session_state().unwrap();
        assert_eq!(s.phase, Phase::Break);
        assert!(s.running);
    }
}
