//! Tray menu as exchanged with the embedding shell.
//!
//! The shell owns the native tray widget. It receives the menu as a list of
//! [`MenuEntryView`]s on `tray-menu` and reports clicks back as a
//! [`MenuActivation`] on `menu-action`.

use serde::{Deserialize, Serialize};

use crate::types::PlayerCommand;

/// Menu entries that act on the companion rather than the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AppAction {
    OpenApp,
    Quit,
}

/// What an activated menu entry does.
///
/// Serialized as a bare string: the player action name (`nextButton`) or
/// the app action (`openApp`, `quit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuActivation {
    Player(PlayerCommand),
    App(AppAction),
}

/// One entry of the `tray-menu` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MenuEntryView {
    Item(MenuItemView),
    Separator,
}

/// A clickable or informational menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemView {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublabel: Option<String>,
    pub enabled: bool,
    /// PNG-encoded icon, base64 in JSON.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_png")]
    pub icon: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<MenuActivation>,
}

mod base64_png {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match data {
            Some(bytes) => s.serialize_str(&STANDARD.encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(d)?;
        encoded
            .map(|s| STANDARD.decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
