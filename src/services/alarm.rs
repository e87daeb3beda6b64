//! Alarm playback through an external command

use tokio::process::Command;
use tracing::{debug, info};

use crate::state::PhaseSwitch;

/// External program (plus arguments) run on every phase switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl AlarmCommand {
    /// Split a shell-like command line on whitespace; `None` if it is empty
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

/// Run the alarm command for a phase switch and wait for it to finish.
///
/// The new phase name is exported as `FOCUS_TIMER_PHASE` so scripts can pick
/// a different sound per phase.
pub async fn play_alarm(command: &AlarmCommand, switch: &PhaseSwitch) -> Result<(), String> {
    debug!("Running alarm command: {} {:?}", command.program, command.args);

    let output = Command::new(&command.program)
        .args(&command.args)
        .env("FOCUS_TIMER_PHASE", switch.to.as_str())
        .output()
        .await
        .map_err(|e| format!("Failed to execute alarm command {}: {}", command.program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("Alarm command failed: {}", stderr.trim()));
    }

    info!("Alarm played for {} phase", switch.to.as_str());
    Ok(())
}
