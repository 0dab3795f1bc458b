//! Tray loop for a tray icon hosted by the shell.
//!
//! Consumes tray updates on its own thread and forwards them over the page
//! bridge: the menu as `tray-menu`, plus `tray-close` and `tray-popup`.
//! Clicks come back on stdin as `menu-action` (see [`crate::bridge`]).

use std::io::Write;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread::JoinHandle;

use deezbar_protocol::MessageType;
use deezbar_tray::{MenuEntry, TrayUpdate};

use crate::bridge::LineBridge;

/// Spawns the loop. It ends on `Shutdown` or when all senders are gone.
pub fn spawn<W: Write + Send + 'static>(
    update_rx: mpsc::Receiver<TrayUpdate>,
    bridge: Arc<LineBridge<W>>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("tray".into())
        .spawn(move || {
            for update in update_rx {
                if !apply(&update, &bridge) {
                    break;
                }
            }
        })
}

/// Forwards one update. Returns `false` once the tray is destroyed.
fn apply<W: Write + Send>(update: &TrayUpdate, bridge: &LineBridge<W>) -> bool {
    match update {
        TrayUpdate::SetMenu(entries) => {
            tracing::debug!(
                now_playing = %summary(entries),
                entries = entries.len(),
                "tray menu installed"
            );
            bridge.publish_menu(entries);
            true
        }
        TrayUpdate::CloseMenu => {
            bridge.signal(MessageType::TrayClose);
            true
        }
        TrayUpdate::PopUpMenu => {
            tracing::info!("tray menu popped up");
            bridge.signal(MessageType::TrayPopup);
            true
        }
        TrayUpdate::Shutdown => {
            tracing::info!("tray icon destroyed");
            false
        }
    }
}

/// "title - artist" from the now-playing entry.
fn summary(entries: &[MenuEntry]) -> String {
    entries
        .iter()
        .filter_map(MenuEntry::as_item)
        .find(|item| item.sublabel.is_some())
        .map(|item| format!("{} - {}", item.label, item.sublabel.as_deref().unwrap_or("")))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use deezbar_tray::{MenuItem, TrayConfig, TrayHandle, TraySurface};

    use super::*;
    use crate::bridge::tests::written;

    #[test]
    fn summary_uses_title_entry() {
        let entries = vec![
            MenuEntry::Separator,
            MenuEntry::Item(MenuItem {
                label: "Song A".into(),
                sublabel: Some("Artist A".into()),
                icon: None,
                enabled: false,
                action: None,
            }),
        ];
        assert_eq!(summary(&entries), "Song A - Artist A");
        assert_eq!(summary(&[]), "");
    }

    #[test]
    fn updates_are_forwarded_until_shutdown() {
        let (handle, _event_tx, update_rx) = TrayHandle::new(TrayConfig::default());
        let bridge = Arc::new(LineBridge::new(Vec::new()));
        let thread = spawn(update_rx, Arc::clone(&bridge)).unwrap();

        let mut surface = handle.updater();
        surface.close_context_menu();
        surface.set_context_menu(vec![MenuEntry::Separator]);
        surface.pop_up_context_menu();
        handle.shutdown();
        // Sent after shutdown: never forwarded.
        surface.pop_up_context_menu();
        thread.join().unwrap();

        let Ok(bridge) = Arc::try_unwrap(bridge) else {
            panic!("tray thread still holds the bridge");
        };
        assert_eq!(
            written(bridge),
            vec![
                r#"{"type":"tray-close"}"#,
                r#"{"type":"tray-menu","payload":[{"kind":"separator"}]}"#,
                r#"{"type":"tray-popup"}"#,
            ]
        );
    }

    #[test]
    fn apply_reports_liveness() {
        let bridge = LineBridge::new(Vec::new());
        assert!(apply(&TrayUpdate::PopUpMenu, &bridge));
        assert!(apply(&TrayUpdate::SetMenu(Vec::new()), &bridge));
        assert!(!apply(&TrayUpdate::Shutdown, &bridge));
    }
}
