//! Wire protocol between the embedded Deezer page, its shell and the tray companion.
//!
//! Every channel shares the same JSON envelope, one per line:
//! - `track-info`: page -> companion, carries a [`TrackSnapshot`]
//! - `deezer-cmd`: companion -> page, carries a [`PlayerCommand`]
//! - `tray-menu` / `tray-close` / `tray-popup`: companion -> shell tray
//! - `menu-action`: shell tray -> companion, carries a [`MenuActivation`]

pub mod constants;
pub mod envelope;
pub mod menu;
pub mod types;

pub use constants::MessageType;
pub use envelope::{Message, ProtocolError};
pub use menu::{AppAction, MenuActivation, MenuEntryView, MenuItemView};
pub use types::{PlayerCommand, TrackSnapshot};
