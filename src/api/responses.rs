//! API response structures

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::view::SessionView;

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    /// Session status after the command: idle, running or paused
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session: SessionView,
}

impl ApiResponse {
    /// Create a new API response; the status is taken from the session itself
    pub fn new(message: String, session: SessionView) -> Self {
        Self {
            status: session.status.as_str().to_string(),
            message,
            timestamp: Utc::now(),
            session,
        }
    }
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub session: SessionView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
