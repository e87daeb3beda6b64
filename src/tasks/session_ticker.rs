//! Session ticker background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::AppState;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that delivers one tick per second while the session is running.
///
/// The interval only exists while the run gate is open. Every gate change
/// drops it, and reopening the gate starts a fresh cadence one full period
/// after that instant, so time spent paused is never replayed.
pub async fn session_ticker_task(state: Arc<AppState>) {
    info!("Starting session ticker task");

    let mut gate_rx = state.watch_run_gate();

    loop {
        let gate = *gate_rx.borrow_and_update();

        if !gate.running {
            debug!("Ticker disarmed, waiting for session to run");
            if gate_rx.changed().await.is_err() {
                break;
            }
            continue;
        }

        debug!("Ticker armed (epoch {})", gate.epoch);
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                // Gate change - re-evaluate, which drops this interval
                changed = gate_rx.changed() => {
                    if changed.is_err() {
                        info!("Run gate closed, stopping session ticker");
                        return;
                    }
                    break;
                }

                _ = interval.tick() => {
                    if let Err(e) = state.tick() {
                        error!("Failed to deliver tick: {}", e);
                    }
                }
            }
        }
    }

    info!("Run gate closed, stopping session ticker");
}
