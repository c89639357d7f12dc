//! # Courier Node
//!
//! Entry point: load configuration, start the runtime, run until Ctrl+C.

use anyhow::Result;
use courier_runtime::container::CourierConfig;
use courier_runtime::CourierRuntime;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string())),
        )
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let config = CourierConfig::from_env();

    // Wire and start
    let runtime = CourierRuntime::start(config).await?;

    // Initial health probe, in the shape the /health endpoint reports
    let report = runtime.health().await;
    info!(health = %serde_json::to_string(&report)?, "Initial store health");

    // Keep the node running
    info!("Courier is running. Press Ctrl+C to stop.");
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
        }
        () = runtime.wait_for_shutdown() => {}
    }

    // Graceful shutdown
    runtime.shutdown().await?;

    Ok(())
}
