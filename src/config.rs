//! Configuration and CLI argument handling

use anyhow::{anyhow, bail};
use clap::Parser;

use crate::{
    services::AlarmCommand,
    state::{DurationBounds, SessionController, BREAK_BOUNDS, FOCUS_BOUNDS},
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "focus-timer")]
#[command(about = "A state-managed HTTP server driving a focus/break session timer")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Initial focus duration in minutes (5-60, multiple of 5)
    #[arg(short, long, default_value = "25")]
    pub focus: u32,

    /// Initial break duration in minutes (1-15)
    #[arg(short, long = "break-minutes", default_value = "5")]
    pub break_minutes: u32,

    /// Command run on every phase switch, e.g. "paplay /usr/share/sounds/bell.oga"
    #[arg(long)]
    pub alarm_command: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Check that the initial durations are reachable values
    pub fn validate(&self) -> anyhow::Result<()> {
        check_minutes("focus", self.focus, FOCUS_BOUNDS)?;
        check_minutes("break", self.break_minutes, BREAK_BOUNDS)?;
        Ok(())
    }

    /// Build the idle controller described by this configuration
    pub fn controller(&self) -> anyhow::Result<SessionController> {
        self.validate()?;
        SessionController::with_durations(self.focus * 60, self.break_minutes * 60)
            .ok_or_else(|| {
                anyhow!(
                    "invalid initial durations: focus={}m break={}m",
                    self.focus,
                    self.break_minutes
                )
            })
    }

    pub fn alarm(&self) -> Option<AlarmCommand> {
        self.alarm_command.as_deref().and_then(AlarmCommand::parse)
    }
}

fn check_minutes(name: &str, minutes: u32, bounds: DurationBounds) -> anyhow::Result<()> {
    let valid = minutes
        .checked_mul(60)
        .is_some_and(|seconds| bounds.contains(seconds));
    if !valid {
        bail!(
            "{} duration must be between {} and {} minutes in steps of {}, got {}",
            name,
            bounds.min / 60,
            bounds.max / 60,
            bounds.step / 60,
            minutes
        );
    }
    Ok(())
}
