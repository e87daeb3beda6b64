//! Focus Timer - A state-managed HTTP server driving a focus/break session timer
//!
//! This library provides the session state machine, the background tasks that
//! tick it and deliver alarms, and the HTTP surface that forwards commands to it.

pub mod config;
pub mod state;
pub mod view;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, SessionController, SessionState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
