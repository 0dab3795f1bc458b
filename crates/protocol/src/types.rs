use serde::{Deserialize, Serialize};

/// One observed now-playing state, as scraped from the page.
///
/// Every field except `is_playing` may be missing while the player is
/// still loading. Snapshots are compared field-wise to drop repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSnapshot {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub cover_url: Option<String>,
    #[serde(default)]
    pub is_playing: bool,
}

impl TrackSnapshot {
    /// Returns `true` if the snapshot names a non-empty artist.
    pub fn has_artist(&self) -> bool {
        self.artist.as_deref().is_some_and(|a| !a.is_empty())
    }
}

/// Player control sent to the page, which clicks the matching button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerCommand {
    #[serde(rename = "playButton")]
    PlayPause,
    #[serde(rename = "prevButton")]
    Previous,
    #[serde(rename = "nextButton")]
    Next,
    #[serde(rename = "repeatButton")]
    Repeat,
    #[serde(rename = "shuffleButton")]
    Shuffle,
}

impl PlayerCommand {
    pub const ALL: [PlayerCommand; 5] = [
        Self::PlayPause,
        Self::Previous,
        Self::Next,
        Self::Repeat,
        Self::Shuffle,
    ];

    /// Returns the action name carried on the `deezer-cmd` channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlayPause => "playButton",
            Self::Previous => "prevButton",
            Self::Next => "nextButton",
            Self::Repeat => "repeatButton",
            Self::Shuffle => "shuffleButton",
        }
    }
}

impl std::fmt::Display for PlayerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
