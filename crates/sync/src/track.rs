use deezbar_artwork::CoverImage;
use deezbar_protocol::TrackSnapshot;

/// Title shown before the first snapshot arrives.
pub const LOADING_TITLE: &str = "Loading...";
pub const UNKNOWN_TRACK: &str = "Unknown Track";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// The renderable now-playing state. Every field always holds a displayable value.
#[derive(Debug, Clone)]
pub struct CurrentTrack {
    pub title: String,
    pub artist: String,
    pub cover: CoverImage,
    pub is_playing: bool,
}

impl CurrentTrack {
    /// State shown while the page is still loading.
    pub fn loading() -> Self {
        Self {
            title: LOADING_TITLE.into(),
            artist: String::new(),
            cover: CoverImage::placeholder(),
            is_playing: false,
        }
    }

    /// Copies the textual fields of a snapshot, substituting defaults for
    /// missing or empty values. The cover is left untouched.
    pub fn apply_text(&mut self, snapshot: &TrackSnapshot) {
        self.title = non_empty_or(snapshot.title.as_deref(), UNKNOWN_TRACK);
        self.artist = non_empty_or(snapshot.artist.as_deref(), UNKNOWN_ARTIST);
        self.is_playing = snapshot.is_playing;
    }
}

impl Default for CurrentTrack {
    fn default() -> Self {
        Self::loading()
    }
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}
