//! System tray menu for the Deezer companion.
//!
//! Builds the now-playing context menu and talks to the platform tray via
//! channels:
//! - [`TrayEvent`]: events from tray to app (menu entry activated)
//! - [`TrayUpdate`]: updates from app to tray (install / close / pop up menu)
//!
//! # Platform notes
//! - The tray event loop must run on the main thread on some platforms
//! - Opening a menu while another one is visible is unreliable on macOS;
//!   callers close the current menu and wait before popping up a new one

mod error;
mod icons;
mod menu;
mod tray;

pub use error::TrayError;
pub use icons::{Icon, IconKind, IconSet, MENU_ICON_SIZE, load_icon};
pub use menu::{
    MenuAction, MenuEntry, MenuItem, MenuState, TITLE_MAX_CHARS, build_menu, truncate_title,
};
pub use tray::{TrayConfig, TrayEvent, TrayHandle, TraySurface, TrayUpdate, TrayUpdater};
