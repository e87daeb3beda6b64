//! End-to-end session scenarios through the public API

use std::{sync::Arc, time::Duration};

use focus_timer::{
    state::{Adjustment, AppState, Phase, SessionController},
    tasks::{alarm_task, session_ticker_task},
};

fn short_session() -> SessionController {
    // 5 minute focus, 1 minute break
    let mut controller = SessionController::new();
    for _ in 0..4 {
        controller.adjust_focus(Adjustment::Decrease);
        controller.adjust_break(Adjustment::Decrease);
    }
    controller
}

#[test]
fn focus_break_focus_with_synthetic_ticks() {
    let mut controller = short_session();
    let s = controller.snapshot();
    assert_eq!((s.focus_duration, s.break_duration), (300, 60));

    controller.start_or_pause();
    let s = controller.snapshot();
    assert_eq!((s.phase, s.phase_length, s.remaining), (Phase::Focus, 300, 300));
    assert!(s.running && s.session_active);

    let mut alarms = 0;
    for _ in 0..299 {
        alarms += usize::from(controller.on_tick().is_some());
    }
    assert_eq!(alarms, 0);
    assert_eq!(controller.snapshot().remaining, 1);

    assert!(controller.on_tick().is_some());
    let s = controller.snapshot();
    assert_eq!((s.phase, s.phase_length, s.remaining), (Phase::Break, 60, 60));
    assert!(s.running);

    for _ in 0..60 {
        alarms += usize::from(controller.on_tick().is_some());
    }
    assert_eq!(alarms, 1);
    let s = controller.snapshot();
    assert_eq!((s.phase, s.phase_length, s.remaining), (Phase::Focus, 300, 300));
}

#[test]
fn boundary_requests_leave_durations_unchanged() {
    let mut controller = SessionController::new();
    for _ in 0..7 {
        controller.adjust_focus(Adjustment::Increase);
    }
    assert_eq!(controller.snapshot().focus_duration, 3600);
    controller.adjust_focus(Adjustment::Increase);
    assert_eq!(controller.snapshot().focus_duration, 3600);

    let mut controller = short_session();
    controller.adjust_break(Adjustment::Decrease);
    assert_eq!(controller.snapshot().break_duration, 60);
}

#[tokio::test(start_paused = true)]
async fn running_server_tasks_chain_phases_and_deliver_alarms() {
    let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), short_session()));
    let alarms = tokio::spawn(alarm_task(state.subscribe_alarms(), None));
    let ticker = tokio::spawn(session_ticker_task(Arc::clone(&state)));

    let mut observer = state.subscribe_alarms();
    state.start_or_pause().unwrap();

    let first = observer.recv().await.unwrap();
    assert_eq!((first.from, first.to, first.phase_length), (Phase::Focus, Phase::Break, 60));

    // Pausing through the whole break must not advance it
    state.start_or_pause().unwrap();
    tokio::time::sleep(Duration::from_secs(3600)).await;
    let s = state.get_session_state().unwrap();
    assert_eq!((s.phase, s.remaining), (Phase::Break, 60));

    state.start_or_pause().unwrap();
    let second = observer.recv().await.unwrap();
    assert_eq!(second.to, Phase::Focus);

    state.stop().unwrap();
    let s = state.get_session_state().unwrap();
    assert!(!s.session_active && !s.running);
    assert_eq!((s.focus_duration, s.break_duration), (300, 60));

    // Closing the alarm channel ends the alarm task with its delivery count
    ticker.abort();
    assert!(ticker.await.unwrap_err().is_cancelled());
    drop(observer);
    drop(state);
    assert_eq!(alarms.await.unwrap(), 2);
}
