//! State management module
//!
//! This module contains the session state machine and the shared handle that
//! serialises access to it.

pub mod phase;
pub mod session_state;
pub mod controller;
pub mod app_state;

// Re-export main types
pub use phase::{Adjustment, Phase};
pub use session_state::{
    DurationBounds, PhaseSwitch, SessionState, SessionStatus, BREAK_BOUNDS,
    DEFAULT_BREAK_SECONDS, DEFAULT_FOCUS_SECONDS, FOCUS_BOUNDS,
};
pub use controller::SessionController;
pub use app_state::{AppState, RunGate};
