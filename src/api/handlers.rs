//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{
    state::{Adjustment, AppState, SessionState, SessionStatus},
    view::{format_mmss, SessionView},
};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

type CommandResult = Result<Json<ApiResponse>, StatusCode>;

/// Turn the outcome of a session command into a response
fn respond(
    action: &str,
    result: Result<SessionState, String>,
    message: impl FnOnce(&SessionState) -> String,
) -> CommandResult {
    match result {
        Ok(session) => {
            let message = message(&session);
            info!("{} endpoint called - {}", action, message);
            Ok(Json(ApiResponse::new(message, session.into())))
        }
        Err(e) => {
            error!("Failed to apply {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /session/toggle - Start a session or pause/resume it
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    respond("toggle", state.start_or_pause(), |session| match session.status() {
        SessionStatus::Running => format!(
            "Session running, {} left in {} phase",
            format_mmss(session.remaining),
            session.phase.as_str()
        ),
        SessionStatus::Paused => format!("Session paused with {} left", format_mmss(session.remaining)),
        SessionStatus::Idle => "Session idle".to_string(),
    })
}

/// Handle POST /session/stop - Stop the active session
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    respond("stop", state.stop(), |_| "Session stopped".to_string())
}

/// Shared body of the four duration endpoints; a rejected step still returns 200
fn adjust(state: &AppState, focus: bool, adjustment: Adjustment) -> CommandResult {
    let (action, result) = if focus {
        ("focus", state.adjust_focus(adjustment))
    } else {
        ("break", state.adjust_break(adjustment))
    };

    respond(action, result, |session| {
        let duration = if focus { session.focus_duration } else { session.break_duration };
        if session.session_active {
            format!("{} duration locked during session at {}", action, format_mmss(duration))
        } else {
            format!("{} duration is {}", action, format_mmss(duration))
        }
    })
}

/// Handle POST /focus/increase
pub async fn focus_increase_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    adjust(&state, true, Adjustment::Increase)
}

/// Handle POST /focus/decrease
pub async fn focus_decrease_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    adjust(&state, true, Adjustment::Decrease)
}

/// Handle POST /break/increase
pub async fn break_increase_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    adjust(&state, false, Adjustment::Increase)
}

/// Handle POST /break/decrease
pub async fn break_decrease_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    adjust(&state, false, Adjustment::Decrease)
}

/// Handle GET /status - Return the latest published snapshot and derived view
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let session = state.current_session();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        session: SessionView::from(session),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
