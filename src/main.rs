//! Focus Timer - A state-managed HTTP server driving a focus/break session timer
//!
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use focus_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{alarm_task, session_ticker_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    let controller = config.controller()?;
    let initial = controller.snapshot();

    info!("Starting focus-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, focus={}s, break={}s",
          config.host, config.port, initial.focus_duration, initial.break_duration);

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), controller));

    // Alarm delivery subscribes before the ticker can produce a phase switch
    let alarm_rx = state.subscribe_alarms();
    let alarm = config.alarm();
    if let Some(alarm) = &alarm {
        info!("Alarm command: {} {:?}", alarm.program, alarm.args);
    }
    tokio::spawn(async move {
        alarm_task(alarm_rx, alarm).await;
    });

    // Start the 1 Hz session ticker
    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        session_ticker_task(ticker_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /session/toggle - Start, pause or resume the session");
    info!("  POST /session/stop   - Stop the session");
    info!("  POST /focus/increase - Focus duration +5 minutes (idle only)");
    info!("  POST /focus/decrease - Focus duration -5 minutes (idle only)");
    info!("  POST /break/increase - Break duration +1 minute (idle only)");
    info!("  POST /break/decrease - Break duration -1 minute (idle only)");
    info!("  GET  /status         - Session snapshot and display values");
    info!("  GET  /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
