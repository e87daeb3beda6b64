//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod session_ticker;
pub mod alarm;

// Re-export main functions
pub use session_ticker::session_ticker_task;
pub use alarm::alarm_task;
