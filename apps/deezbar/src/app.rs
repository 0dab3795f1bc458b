//! Application orchestrator: wires tray, page bridge and synchronizer together.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use deezbar_artwork::CoverFetcher;
use deezbar_sync::{Flow, MenuRenderer, PageBridge, Synchronizer, dispatch};
use deezbar_tray::{Icon, TrayConfig, TrayHandle};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::bridge::{self, LineBridge};
use crate::config::Config;
use crate::tray_loop;

/// Runs the companion until quit is requested or the page goes away.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    // -- Page bridge --
    let bridge = Arc::new(LineBridge::stdout());

    // -- Tray --
    let app_icon = load_app_icon(&config.app_icon_path())?;
    tracing::debug!(size = app_icon.width(), "tray icon validated");
    let tray_config = TrayConfig {
        tooltip: config.tooltip.clone(),
    };
    let (tray, event_tx, update_rx) = TrayHandle::new(tray_config);
    let tray_thread = tray_loop::spawn(update_rx, Arc::clone(&bridge))?;
    tracing::info!(tooltip = tray.tooltip(), "tray ready");

    // -- Synchronizer --
    let fetcher = CoverFetcher::new(&config.fetch_config())?;
    let renderer = MenuRenderer::new(tray.updater(), &config.icons_dir)
        .with_popup_delay(config.popup_delay());
    let synchronizer = Synchronizer::new(Arc::new(fetcher), renderer);

    let (snapshot_tx, snapshot_rx) = mpsc::channel(64);
    let sync_task = supervise("synchronizer", synchronizer.run(snapshot_rx));

    let reader_cancel = cancel.clone();
    let mut reader_task = tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        bridge::read_page_input(stdin, snapshot_tx, event_tx, reader_cancel).await
    });

    tracing::info!("companion ready");

    // -- Main loop: wait for shutdown --
    let quit_via_tray = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, shutting down");
            false
        }
        res = &mut reader_task => {
            log_reader_exit(res);
            false
        }
        _ = tray_events(&tray, bridge.as_ref()) => true,
    };

    // -- Graceful shutdown --
    cancel.cancel();
    if !quit_via_tray {
        bridge.destroy();
        tray.shutdown();
    }

    // The synchronizer stops once the reader drops its sender.
    if tokio::time::timeout(Duration::from_secs(2), sync_task)
        .await
        .is_err()
    {
        tracing::warn!("synchronizer did not stop in time");
    }
    if tokio::task::spawn_blocking(move || tray_thread.join())
        .await
        .is_err()
    {
        tracing::warn!("tray thread did not exit cleanly");
    }

    Ok(())
}

/// Reads and validates the tray icon. A missing or broken icon is fatal.
fn load_app_icon(path: &Path) -> anyhow::Result<Icon> {
    let data = std::fs::read(path)
        .with_context(|| format!("tray icon not found at {}", path.display()))?;
    Icon::decode(&data).with_context(|| format!("invalid tray icon at {}", path.display()))
}

/// Polls tray events until quit is requested.
async fn tray_events(tray: &TrayHandle, bridge: &dyn PageBridge) {
    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    loop {
        ticker.tick().await;
        while let Some(event) = tray.try_recv_event() {
            if dispatch(event, bridge, tray) == Flow::Quit {
                return;
            }
        }
    }
}

/// Spawns a task and logs its failure instead of propagating it.
fn supervise<F>(name: &'static str, fut: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let task = tokio::spawn(fut);
    tokio::spawn(async move {
        if let Err(e) = task.await {
            tracing::error!(task = name, "background task failed: {e}");
        }
    })
}

fn log_reader_exit(res: Result<std::io::Result<()>, JoinError>) {
    match res {
        Ok(Ok(())) => tracing::info!("page bridge closed, shutting down"),
        Ok(Err(e)) => tracing::error!("page bridge read failed: {e}"),
        Err(e) => tracing::error!("page bridge task failed: {e}"),
    }
}
