//! Line-delimited JSON bridge to the page host.
//!
//! The shell hosting the hidden player page and the tray icon writes
//! `track-info` and `menu-action` envelopes to our stdin. It reads
//! `deezer-cmd`, `show-window`, `destroy` and the `tray-*` envelopes from
//! our stdout, one per line.

use std::io::Write;
use std::sync::Mutex;

use deezbar_protocol::{
    MenuActivation, Message, MessageType, PlayerCommand, ProtocolError, TrackSnapshot,
};
use deezbar_sync::PageBridge;
use deezbar_tray::{MenuEntry, TrayEvent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Writes outbound envelopes to a line sink.
pub struct LineBridge<W: Write + Send> {
    out: Mutex<W>,
}

impl LineBridge<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> LineBridge<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Publishes the tray menu to the shell.
    pub fn publish_menu(&self, entries: &[MenuEntry]) {
        let views: Vec<_> = entries.iter().map(MenuEntry::to_view).collect();
        self.write(Message::tray_menu(&views));
    }

    /// Sends a payload-less envelope.
    pub fn signal(&self, msg_type: MessageType) {
        self.write(Ok(Message::signal(msg_type)));
    }

    fn write(&self, msg: Result<Message, serde_json::Error>) {
        let line = match msg {
            Ok(msg) => msg.to_line(),
            Err(e) => Err(e.into()),
        };
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("failed to encode bridge message: {e}");
                return;
            }
        };

        let Ok(mut out) = self.out.lock() else {
            tracing::error!("bridge writer poisoned");
            return;
        };
        if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            tracing::warn!("page bridge write failed: {e}");
        }
    }
}

impl<W: Write + Send> PageBridge for LineBridge<W> {
    fn send_command(&self, cmd: PlayerCommand) {
        self.write(Message::command(cmd));
    }

    fn show_window(&self) {
        self.signal(MessageType::ShowWindow);
    }

    fn destroy(&self) {
        self.signal(MessageType::Destroy);
    }
}

/// Reads the shell's input stream.
///
/// `track-info` snapshots go to the synchronizer and `menu-action` clicks to
/// the tray event channel. Lines that are not UTF-8, not JSON, or of another
/// message type are logged and skipped. Returns when the input ends, the
/// synchronizer is gone, or `cancel` fires.
pub async fn read_page_input<R: AsyncBufRead + Unpin>(
    mut reader: R,
    snapshots: mpsc::Sender<TrackSnapshot>,
    events: std::sync::mpsc::Sender<TrayEvent>,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            read = reader.read_until(b'\n', &mut buf) => read?,
        };
        if read == 0 {
            tracing::info!("page bridge input closed");
            return Ok(());
        }

        let Ok(line) = std::str::from_utf8(&buf) else {
            tracing::warn!(bytes = buf.len(), "ignoring bridge line: not valid UTF-8");
            continue;
        };
        if line.trim().is_empty() {
            continue;
        }

        let msg = match Message::from_line(line) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!("ignoring bridge line: {e}");
                continue;
            }
        };

        match msg.msg_type {
            MessageType::TrackInfo => {
                let Some(snapshot) = decode::<TrackSnapshot>(&msg, MessageType::TrackInfo) else {
                    continue;
                };
                tracing::debug!(?snapshot, "track info received");
                if snapshots.send(snapshot).await.is_err() {
                    tracing::debug!("synchronizer gone, bridge reader stopping");
                    return Ok(());
                }
            }
            MessageType::MenuAction => {
                let Some(activation) = decode::<MenuActivation>(&msg, MessageType::MenuAction)
                else {
                    continue;
                };
                tracing::debug!(?activation, "menu entry activated");
                if events.send(TrayEvent::from_action(activation.into())).is_err() {
                    tracing::debug!("tray handle gone, menu action dropped");
                }
            }
            other => tracing::warn!(msg_type = %other, "ignoring unexpected bridge message"),
        }
    }
}

fn decode<T: for<'de> serde::Deserialize<'de>>(msg: &Message, expected: MessageType) -> Option<T> {
    msg.expect_payload(expected)
        .map_err(|e: ProtocolError| tracing::warn!("ignoring bridge line: {e}"))
        .ok()
}
