//! External side effects module
//!
//! This module contains functions that reach outside the process, such as
//! running the configured alarm command.

pub mod alarm;

// Re-export main functions
pub use alarm::*;
