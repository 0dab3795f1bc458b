use serde::{Deserialize, Serialize};

/// Channel message type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    // Page -> companion
    #[serde(rename = "track-info")]
    TrackInfo,

    // Companion -> page
    #[serde(rename = "deezer-cmd")]
    DeezerCmd,

    // Companion -> embedding shell
    #[serde(rename = "show-window")]
    ShowWindow,
    #[serde(rename = "destroy")]
    Destroy,
    #[serde(rename = "tray-menu")]
    TrayMenu,
    #[serde(rename = "tray-close")]
    TrayClose,
    #[serde(rename = "tray-popup")]
    TrayPopup,

    // Embedding shell -> companion
    #[serde(rename = "menu-action")]
    MenuAction,
}

impl MessageType {
    /// Returns the wire name of this message type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TrackInfo => "track-info",
            Self::DeezerCmd => "deezer-cmd",
            Self::ShowWindow => "show-window",
            Self::Destroy => "destroy",
            Self::TrayMenu => "tray-menu",
            Self::TrayClose => "tray-close",
            Self::TrayPopup => "tray-popup",
            Self::MenuAction => "menu-action",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
