//! Deezer tray companion entry point.

mod app;
mod bridge;
mod config;
mod tray_loop;

use std::time::Duration;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the page bridge.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Panics in background tasks are logged, never fatal.
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("unhandled panic: {info}");
    }));

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting deezbar");

    let config = config::Config::load()?;
    tracing::info!(icons_dir = %config.icons_dir, "configuration loaded");

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(app::run(config));
    // The stdin reader may still be parked in a blocking read.
    rt.shutdown_timeout(Duration::from_secs(1));
    result?;

    tracing::info!("shut down cleanly");
    Ok(())
}
