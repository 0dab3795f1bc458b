//! Tray menu activations.

use deezbar_protocol::PlayerCommand;
use deezbar_tray::{TrayEvent, TrayHandle};

/// The embedded player page and the shell window hosting it.
pub trait PageBridge: Send + Sync {
    /// Forwards a player control over the `deezer-cmd` channel.
    fn send_command(&self, cmd: PlayerCommand);
    /// Shows, restores and focuses the player window.
    fn show_window(&self);
    /// Destroys the embedded page surface.
    fn destroy(&self);
}

/// Whether the app keeps running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies one tray event.
///
/// Quit tears down the page surface and the tray icon; the caller then
/// exits the process.
pub fn dispatch(event: TrayEvent, bridge: &dyn PageBridge, tray: &TrayHandle) -> Flow {
    match event {
        TrayEvent::Command(cmd) => {
            tracing::debug!(command = %cmd, "forwarding player command");
            bridge.send_command(cmd);
            Flow::Continue
        }
        TrayEvent::OpenAppRequested => {
            bridge.show_window();
            Flow::Continue
        }
        TrayEvent::QuitRequested => {
            tracing::info!("quit requested via tray");
            bridge.destroy();
            tray.shutdown();
            Flow::Quit
        }
    }
}
