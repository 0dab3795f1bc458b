//! Tray handle, events, and update types.
//!
//! The native tray widget is owned by the platform event loop. This module
//! defines the channel-based interface that the companion core uses to
//! drive it, independent of the GUI backend.

use std::sync::mpsc;

use deezbar_protocol::PlayerCommand;

use crate::menu::{MenuAction, MenuEntry};

/// Configuration for the system tray.
#[derive(Debug, Clone)]
pub struct TrayConfig {
    /// Tooltip shown when hovering the tray icon.
    pub tooltip: String,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            tooltip: "Deezer Player".into(),
        }
    }
}

/// Events emitted by the tray to the companion core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    /// A player control entry was clicked.
    Command(PlayerCommand),
    /// User clicked "Open Deezer".
    OpenAppRequested,
    /// User clicked "Quit" in the context menu.
    QuitRequested,
}

impl TrayEvent {
    /// Maps an activated menu action to the event the tray loop emits.
    pub fn from_action(action: MenuAction) -> Self {
        match action {
            MenuAction::Command(cmd) => Self::Command(cmd),
            MenuAction::OpenApp => Self::OpenAppRequested,
            MenuAction::Quit => Self::QuitRequested,
        }
    }
}

/// Updates sent from the companion core to the tray.
#[derive(Debug, Clone)]
pub enum TrayUpdate {
    /// Replace the context menu.
    SetMenu(Vec<MenuEntry>),
    /// Close the context menu if it is open.
    CloseMenu,
    /// Programmatically open the installed context menu.
    PopUpMenu,
    /// Request tray shutdown (destroys the tray icon).
    Shutdown,
}

/// Operations the menu renderer needs from a tray.
pub trait TraySurface: Send {
    fn close_context_menu(&mut self);
    fn set_context_menu(&mut self, entries: Vec<MenuEntry>);
    fn pop_up_context_menu(&mut self);
}

/// Sending half of the tray update channel.
#[derive(Debug, Clone)]
pub struct TrayUpdater {
    tx: mpsc::Sender<TrayUpdate>,
}

impl TrayUpdater {
    fn send(&self, update: TrayUpdate) {
        if self.tx.send(update).is_err() {
            tracing::debug!("tray loop gone, update dropped");
        }
    }
}

impl TraySurface for TrayUpdater {
    fn close_context_menu(&mut self) {
        self.send(TrayUpdate::CloseMenu);
    }

    fn set_context_menu(&mut self, entries: Vec<MenuEntry>) {
        self.send(TrayUpdate::SetMenu(entries));
    }

    fn pop_up_context_menu(&mut self) {
        self.send(TrayUpdate::PopUpMenu);
    }
}

/// Handle for communicating with the system tray from the companion core.
///
/// The tray event loop runs on the main thread and communicates via channels.
pub struct TrayHandle {
    updater: TrayUpdater,
    /// Receive events from the tray.
    event_rx: mpsc::Receiver<TrayEvent>,
    config: TrayConfig,
}

impl TrayHandle {
    /// Creates a new tray handle with its channel pair.
    ///
    /// Returns `(handle, event_sender, update_receiver)`; the sender/receiver
    /// pair is given to the tray event loop running on the main thread.
    pub fn new(config: TrayConfig) -> (Self, mpsc::Sender<TrayEvent>, mpsc::Receiver<TrayUpdate>) {
        let (update_tx, update_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let handle = Self {
            updater: TrayUpdater { tx: update_tx },
            event_rx,
            config,
        };

        (handle, event_tx, update_rx)
    }

    /// Returns a surface the menu renderer can drive.
    pub fn updater(&self) -> TrayUpdater {
        self.updater.clone()
    }

    /// Requests the tray to shut down.
    pub fn shutdown(&self) {
        self.updater.send(TrayUpdate::Shutdown);
    }

    /// Tries to receive a tray event (non-blocking).
    pub fn try_recv_event(&self) -> Option<TrayEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn tooltip(&self) -> &str {
        &self.config.tooltip
    }
}
