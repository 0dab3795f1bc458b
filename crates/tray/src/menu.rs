//! Now-playing context menu for the system tray.

use deezbar_protocol::{AppAction, MenuActivation, MenuEntryView, MenuItemView, PlayerCommand};

use crate::icons::{Icon, IconSet};

/// Longest title shown before truncation, in characters.
pub const TITLE_MAX_CHARS: usize = 30;

/// Actions that can be triggered from the tray context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Forward a player control to the page.
    Command(PlayerCommand),
    /// Bring the player window to the foreground.
    OpenApp,
    /// User requested to quit the application.
    Quit,
}

impl From<MenuAction> for MenuActivation {
    fn from(action: MenuAction) -> Self {
        match action {
            MenuAction::Command(cmd) => Self::Player(cmd),
            MenuAction::OpenApp => Self::App(AppAction::OpenApp),
            MenuAction::Quit => Self::App(AppAction::Quit),
        }
    }
}

impl From<MenuActivation> for MenuAction {
    fn from(activation: MenuActivation) -> Self {
        match activation {
            MenuActivation::Player(cmd) => Self::Command(cmd),
            MenuActivation::App(AppAction::OpenApp) => Self::OpenApp,
            MenuActivation::App(AppAction::Quit) => Self::Quit,
        }
    }
}

/// A single menu item.
#[derive(Debug, Clone)]
pub struct MenuItem {
    /// Display text.
    pub label: String,
    /// Secondary line under the label.
    pub sublabel: Option<String>,
    pub icon: Option<Icon>,
    /// Whether the item is enabled (clickable).
    pub enabled: bool,
    /// Optional action triggered on click.
    pub action: Option<MenuAction>,
}

impl MenuItem {
    fn control(label: &str, icon: &Option<Icon>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            sublabel: None,
            icon: icon.clone(),
            enabled: true,
            action: Some(action),
        }
    }
}

/// An entry of the context menu.
#[derive(Debug, Clone)]
pub enum MenuEntry {
    Item(MenuItem),
    Separator,
}

impl MenuEntry {
    /// Returns the item, or `None` for a separator.
    pub fn as_item(&self) -> Option<&MenuItem> {
        match self {
            Self::Item(item) => Some(item),
            Self::Separator => None,
        }
    }

    /// Wire form for a tray hosted by the shell. An icon that fails to
    /// encode is left out of that entry.
    pub fn to_view(&self) -> MenuEntryView {
        let Self::Item(item) = self else {
            return MenuEntryView::Separator;
        };

        let icon = item.icon.as_ref().and_then(|icon| match icon.to_png() {
            Ok(png) => Some(png),
            Err(e) => {
                tracing::warn!(label = %item.label, "menu icon dropped: {e}");
                None
            }
        });

        MenuEntryView::Item(MenuItemView {
            label: item.label.clone(),
            sublabel: item.sublabel.clone(),
            enabled: item.enabled,
            icon,
            action: item.action.map(MenuActivation::from),
        })
    }
}

/// Current state used to build the context menu.
#[derive(Debug, Clone)]
pub struct MenuState {
    pub title: String,
    pub artist: String,
    /// Cover artwork shown as the first, decorative entry.
    pub cover: Icon,
    pub is_playing: bool,
}

/// Shortens `text` to at most `max` characters, ending with `…` when cut.
pub fn truncate_title(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Builds the menu entries from the current state.
///
/// Layout: cover, title/artist, separator, the five player controls,
/// separator, open app, quit.
pub fn build_menu(state: &MenuState, icons: &IconSet) -> Vec<MenuEntry> {
    let mut entries = Vec::with_capacity(11);

    // Header: cover and now-playing text, both informational.
    entries.push(MenuEntry::Item(MenuItem {
        label: String::new(),
        sublabel: None,
        icon: Some(state.cover.clone()),
        enabled: false,
        action: None,
    }));
    entries.push(MenuEntry::Item(MenuItem {
        label: truncate_title(&state.title, TITLE_MAX_CHARS),
        sublabel: Some(state.artist.clone()),
        icon: None,
        enabled: false,
        action: None,
    }));

    entries.push(MenuEntry::Separator);

    let play_label = if state.is_playing { "Stop" } else { "Play" };
    let controls = [
        ("Previous", &icons.previous, PlayerCommand::Previous),
        (play_label, &icons.play_stop, PlayerCommand::PlayPause),
        ("Next", &icons.next, PlayerCommand::Next),
        ("Repeat", &icons.repeat, PlayerCommand::Repeat),
        ("Shuffle", &icons.shuffle, PlayerCommand::Shuffle),
    ];
    for (label, icon, cmd) in controls {
        entries.push(MenuEntry::Item(MenuItem::control(
            label,
            icon,
            MenuAction::Command(cmd),
        )));
    }

    entries.push(MenuEntry::Separator);

    entries.push(MenuEntry::Item(MenuItem::control(
        "Open Deezer",
        &icons.open_app,
        MenuAction::OpenApp,
    )));
    entries.push(MenuEntry::Item(MenuItem::control(
        "Quit",
        &icons.quit,
        MenuAction::Quit,
    )));

    entries
}
