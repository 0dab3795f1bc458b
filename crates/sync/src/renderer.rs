//! Tray menu rendering.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use deezbar_tray::{Icon, IconSet, MenuState, TraySurface, build_menu};

use crate::track::CurrentTrack;

/// Settle time between closing an open menu and popping up the new one.
pub const DEFAULT_POPUP_DELAY: Duration = Duration::from_millis(500);

/// Boxed future returned by [`Renderer::rebuild`].
pub type RenderFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Turns the current track into a visible menu.
pub trait Renderer: Send {
    /// Rebuilds the menu. When `reveal` is set the new menu is also popped
    /// up so the user sees the first track that starts playing.
    fn rebuild<'a>(&'a mut self, track: &'a CurrentTrack, reveal: bool) -> RenderFuture<'a>;
}

/// Renders the now-playing menu onto a tray surface.
pub struct MenuRenderer<S: TraySurface> {
    surface: S,
    icons_dir: PathBuf,
    popup_delay: Duration,
}

impl<S: TraySurface> MenuRenderer<S> {
    pub fn new(surface: S, icons_dir: impl Into<PathBuf>) -> Self {
        Self {
            surface,
            icons_dir: icons_dir.into(),
            popup_delay: DEFAULT_POPUP_DELAY,
        }
    }

    /// Overrides the settle delay used before the first-reveal popup.
    pub fn with_popup_delay(mut self, delay: Duration) -> Self {
        self.popup_delay = delay;
        self
    }

    async fn rebuild_menu(&mut self, track: &CurrentTrack, reveal: bool) {
        // Icons are re-read on every build; each one may be missing.
        let icons = IconSet::load(&self.icons_dir, track.is_playing).await;
        let state = MenuState {
            title: track.title.clone(),
            artist: track.artist.clone(),
            cover: Icon::from_rgba(track.cover.pixels()),
            is_playing: track.is_playing,
        };
        let entries = build_menu(&state, &icons);

        tracing::info!(
            title = %track.title,
            artist = %track.artist,
            playing = track.is_playing,
            placeholder = track.cover.is_placeholder(),
            icons = icons.loaded_count(),
            reveal,
            "rebuilding tray menu"
        );

        if reveal {
            // Close -> settle -> install -> pop up; popping over an open menu is unreliable.
            self.surface.close_context_menu();
            tokio::time::sleep(self.popup_delay).await;
            self.surface.set_context_menu(entries);
            self.surface.pop_up_context_menu();
        } else {
            self.surface.set_context_menu(entries);
        }
    }
}

impl<S: TraySurface> Renderer for MenuRenderer<S> {
    fn rebuild<'a>(&'a mut self, track: &'a CurrentTrack, reveal: bool) -> RenderFuture<'a> {
        Box::pin(self.rebuild_menu(track, reveal))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use deezbar_tray::{MenuEntry, TrayConfig, TrayHandle, TrayUpdate};
    use tokio::time::Instant;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Close,
        Set(usize),
        PopUp,
    }

    #[derive(Clone, Default)]
    struct RecordingSurface {
        ops: Arc<Mutex<Vec<(Op, Instant)>>>,
    }

    impl RecordingSurface {
        fn ops(&self) -> Vec<Op> {
            self.ops.lock().unwrap().iter().map(|(op, _)| op.clone()).collect()
        }
    }

    impl TraySurface for RecordingSurface {
        fn close_context_menu(&mut self) {
            self.ops.lock().unwrap().push((Op::Close, Instant::now()));
        }

        fn set_context_menu(&mut self, entries: Vec<MenuEntry>) {
            self.ops
                .lock()
                .unwrap()
                .push((Op::Set(entries.len()), Instant::now()));
        }

        fn pop_up_context_menu(&mut self) {
            self.ops.lock().unwrap().push((Op::PopUp, Instant::now()));
        }
    }

    fn track(playing: bool) -> CurrentTrack {
        CurrentTrack {
            title: "Song A".into(),
            artist: "Artist A".into(),
            is_playing: playing,
            ..CurrentTrack::loading()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn plain_rebuild_only_installs() {
        let surface = RecordingSurface::default();
        let mut renderer = MenuRenderer::new(surface.clone(), "/nonexistent/icons");

        renderer.rebuild(&track(true), false).await;
        assert_eq!(surface.ops(), vec![Op::Set(11)]);
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_closes_waits_installs_then_pops_up() {
        let surface = RecordingSurface::default();
        let mut renderer = MenuRenderer::new(surface.clone(), "/nonexistent/icons");

        renderer.rebuild(&track(true), true).await;

        let ops = surface.ops.lock().unwrap().clone();
        let kinds: Vec<_> = ops.iter().map(|(op, _)| op.clone()).collect();
        assert_eq!(kinds, vec![Op::Close, Op::Set(11), Op::PopUp]);
        assert!(ops[1].1 - ops[0].1 >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn popup_delay_is_configurable() {
        let surface = RecordingSurface::default();
        let mut renderer = MenuRenderer::new(surface.clone(), "/nonexistent/icons")
            .with_popup_delay(Duration::from_millis(20));

        let start = Instant::now();
        renderer.rebuild(&track(false), true).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(20));
        assert!(elapsed < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn renders_through_tray_channel() {
        let (handle, _event_tx, update_rx) = TrayHandle::new(TrayConfig::default());
        let mut renderer = MenuRenderer::new(handle.updater(), "/nonexistent/icons");

        renderer.rebuild(&track(true), false).await;

        let update = update_rx.try_recv().unwrap();
        let TrayUpdate::SetMenu(entries) = &update else {
            panic!("expected SetMenu, got {update:?}");
        };
        let title = entries[1].as_item().unwrap();
        assert_eq!(title.label, "Song A");
        assert_eq!(title.sublabel.as_deref(), Some("Artist A"));
        assert_eq!(entries[4].as_item().unwrap().label, "Stop");
        assert_eq!(entries[0].as_item().unwrap().icon.as_ref().unwrap().width(), 192);
    }
}
