//! Alarm delivery background task

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::{
    services::{play_alarm, AlarmCommand},
    state::PhaseSwitch,
};

/// Background task that turns phase switch notifications into alarms.
///
/// Each configured command runs in its own task so a slow or failing player
/// never holds up the next notification. Returns the number of notifications
/// handled once the channel closes.
pub async fn alarm_task(
    mut alarm_rx: broadcast::Receiver<PhaseSwitch>,
    command: Option<AlarmCommand>,
) -> u64 {
    info!("Starting alarm task");

    let mut handled = 0;

    loop {
        match alarm_rx.recv().await {
            Ok(switch) => {
                handled += 1;
                info!(
                    "Alarm: {} finished, {} begins for {}s",
                    switch.from.as_str(),
                    switch.to.as_str(),
                    switch.phase_length
                );

                if let Some(command) = command.clone() {
                    tokio::spawn(async move {
                        if let Err(e) = play_alarm(&command, &switch).await {
                            warn!("Alarm delivery failed: {}", e);
                        }
                    });
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Alarm task lagged, {} notifications skipped", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Alarm channel closed, stopping alarm task");
                break;
            }
        }
    }

    handled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AppState, SessionController};

    #[tokio::test]
    async fn test_failing_command_does_not_stop_alarms() {
        let state = AppState::new(
            0,
            "127.0.0.1".to_string(),
            SessionController::with_durations(300, 60).unwrap(),
        );
        let command = AlarmCommand::parse("focus-timer-no-such-alarm-binary");
        let handle = tokio::spawn(alarm_task(state.subscribe_alarms(), command));

        state.start_or_pause().unwrap();
        for _ in 0..360 {
            state.tick().unwrap();
        }

        let s = state.get_session_state().unwrap();
        assert!(s.running);
        assert_eq!(s.remaining, 300);

        drop(state);
        assert_eq!(handle.await.unwrap(), 2);
    }
}
