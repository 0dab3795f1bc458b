//! Menu entry icons loaded from the assets directory.
//!
//! Each icon is optional: a missing, empty or undecodable file only drops
//! the icon of that entry.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;
use image::{ImageFormat, RgbaImage};

use crate::error::TrayError;

/// Edge length of menu entry icons, in pixels.
pub const MENU_ICON_SIZE: u32 = 22;

/// A decoded RGBA bitmap attached to a menu entry.
#[derive(Debug, Clone)]
pub struct Icon(Arc<RgbaImage>);

impl Icon {
    /// Wraps already decoded pixels.
    pub fn from_rgba(pixels: Arc<RgbaImage>) -> Self {
        Self(pixels)
    }

    /// Decodes an encoded image and scales it to [`MENU_ICON_SIZE`].
    pub fn decode(bytes: &[u8]) -> Result<Self, TrayError> {
        if bytes.is_empty() {
            return Err(TrayError::EmptyIcon);
        }
        let img = image::load_from_memory(bytes)?;
        if img.width() == 0 || img.height() == 0 {
            return Err(TrayError::EmptyIcon);
        }
        let resized = img.resize_exact(MENU_ICON_SIZE, MENU_ICON_SIZE, FilterType::Triangle);
        Ok(Self(Arc::new(resized.to_rgba8())))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Encodes the bitmap as PNG for tray backends that take image files.
    pub fn to_png(&self) -> Result<Vec<u8>, TrayError> {
        let mut out = Cursor::new(Vec::new());
        self.0
            .write_to(&mut out, ImageFormat::Png)
            .map_err(TrayError::Encode)?;
        Ok(out.into_inner())
    }
}

/// The fixed set of menu icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Play,
    Stop,
    Previous,
    Next,
    Repeat,
    Shuffle,
    OpenApp,
    Quit,
}

impl IconKind {
    /// File name inside the icons directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Play => "play.png",
            Self::Stop => "stop.png",
            Self::Previous => "previous.png",
            Self::Next => "next.png",
            Self::Repeat => "repeat.png",
            Self::Shuffle => "shuffle.png",
            Self::OpenApp => "open_app.png",
            Self::Quit => "quit.png",
        }
    }
}

/// Icons for one menu build. `play_stop` follows the playback state.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    pub play_stop: Option<Icon>,
    pub previous: Option<Icon>,
    pub next: Option<Icon>,
    pub repeat: Option<Icon>,
    pub shuffle: Option<Icon>,
    pub open_app: Option<Icon>,
    pub quit: Option<Icon>,
}

impl IconSet {
    /// Loads every icon from `dir`. Never fails as a whole.
    pub async fn load(dir: &Path, is_playing: bool) -> Self {
        let play_stop = if is_playing {
            IconKind::Stop
        } else {
            IconKind::Play
        };

        Self {
            play_stop: load_icon(dir, play_stop).await,
            previous: load_icon(dir, IconKind::Previous).await,
            next: load_icon(dir, IconKind::Next).await,
            repeat: load_icon(dir, IconKind::Repeat).await,
            shuffle: load_icon(dir, IconKind::Shuffle).await,
            open_app: load_icon(dir, IconKind::OpenApp).await,
            quit: load_icon(dir, IconKind::Quit).await,
        }
    }

    /// Number of icons that loaded.
    pub fn loaded_count(&self) -> usize {
        [
            &self.play_stop,
            &self.previous,
            &self.next,
            &self.repeat,
            &self.shuffle,
            &self.open_app,
            &self.quit,
        ]
        .iter()
        .filter(|i| i.is_some())
        .count()
    }
}

/// Loads a single icon, logging and returning `None` on any failure.
pub async fn load_icon(dir: &Path, kind: IconKind) -> Option<Icon> {
    let path = dir.join(kind.file_name());
    let result = match tokio::fs::read(&path).await {
        Ok(bytes) => Icon::decode(&bytes),
        Err(e) => Err(TrayError::Io(e)),
    };

    match result {
        Ok(icon) => Some(icon),
        Err(e) => {
            tracing::warn!(path = %path.display(), "icon unavailable: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, Rgba};

    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn decode_scales_to_menu_size() {
        let icon = Icon::decode(&png(64, 64)).unwrap();
        assert_eq!((icon.width(), icon.height()), (22, 22));
    }

    #[test]
    fn png_encoding_decodes_back() {
        let icon = Icon::decode(&png(64, 64)).unwrap();
        let again = Icon::decode(&icon.to_png().unwrap()).unwrap();
        assert_eq!((again.width(), again.height()), (22, 22));
    }

    #[test]
    fn decode_empty_fails() {
        assert!(matches!(Icon::decode(&[]), Err(TrayError::EmptyIcon)));
    }

    #[test]
    fn file_names_unique() {
        let kinds = [
            IconKind::Play,
            IconKind::Stop,
            IconKind::Previous,
            IconKind::Next,
            IconKind::Repeat,
            IconKind::Shuffle,
            IconKind::OpenApp,
            IconKind::Quit,
        ];
        let mut names: Vec<_> = kinds.iter().map(|k| k.file_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), kinds.len());
    }

    #[tokio::test]
    async fn load_full_set() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "play.png",
            "stop.png",
            "previous.png",
            "next.png",
            "repeat.png",
            "shuffle.png",
            "open_app.png",
            "quit.png",
        ] {
            std::fs::write(dir.path().join(name), png(32, 32)).unwrap();
        }

        let icons = IconSet::load(dir.path(), false).await;
        assert_eq!(icons.loaded_count(), 7);
    }

    #[tokio::test]
    async fn missing_and_broken_icons_degrade_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stop.png"), png(32, 32)).unwrap();
        std::fs::write(dir.path().join("next.png"), b"").unwrap();
        std::fs::write(dir.path().join("quit.png"), b"garbage").unwrap();

        let icons = IconSet::load(dir.path(), true).await;
        assert!(icons.play_stop.is_some());
        assert!(icons.next.is_none());
        assert!(icons.quit.is_none());
        assert!(icons.previous.is_none());
        assert_eq!(icons.loaded_count(), 1);
    }

    #[tokio::test]
    async fn play_stop_follows_state() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("play.png"), png(32, 32)).unwrap();

        assert!(IconSet::load(dir.path(), false).await.play_stop.is_some());
        assert!(IconSet::load(dir.path(), true).await.play_stop.is_none());
    }

    #[tokio::test]
    async fn missing_directory_yields_no_icons() {
        let icons = IconSet::load(Path::new("/nonexistent/deezbar/icons"), false).await;
        assert_eq!(icons.loaded_count(), 0);
    }
}
