//! Ad video upload service entry point.

mod adapter;
mod app;
mod config;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting ad video upload service"
    );

    let config = config::Config::load()?;
    tracing::info!(
        port = config.server.port,
        api_version = %config.graph.api_version,
        "configuration loaded"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(config))?;

    tracing::info!("upload service shut down cleanly");
    Ok(())
}
