//! Companion configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux/macOS: `~/.config/deezbar/config.toml`
//! - Windows: `%APPDATA%/deezbar/config.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use deezbar_artwork::FetchConfig;
use deezbar_artwork::client::DEFAULT_USER_AGENT;
use serde::{Deserialize, Serialize};

/// Companion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the menu icons and the tray icon.
    #[serde(default = "default_icons_dir")]
    pub icons_dir: String,

    /// Tray icon file name inside `icons_dir`.
    #[serde(default = "default_app_icon")]
    pub app_icon: String,

    /// Tooltip of the tray icon.
    #[serde(default = "default_tooltip")]
    pub tooltip: String,

    /// Settle delay before the first-reveal popup, in milliseconds.
    #[serde(default = "default_popup_delay_ms")]
    pub popup_delay_ms: u64,

    /// User agent for cover downloads.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// `Accept-Language` header for cover downloads.
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Cover download timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_icons_dir() -> String {
    "assets/icons".into()
}

fn default_app_icon() -> String {
    "app.png".into()
}

fn default_tooltip() -> String {
    "Deezer Player".into()
}

fn default_popup_delay_ms() -> u64 {
    500
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_accept_language() -> String {
    FetchConfig::default().accept_language
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            icons_dir: default_icons_dir(),
            app_icon: default_app_icon(),
            tooltip: default_tooltip(),
            popup_delay_ms: default_popup_delay_ms(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Full path of the tray icon.
    pub fn app_icon_path(&self) -> PathBuf {
        Path::new(&self.icons_dir).join(&self.app_icon)
    }

    pub fn popup_delay(&self) -> Duration {
        Duration::from_millis(self.popup_delay_ms)
    }

    /// HTTP settings for the cover fetcher. A zero timeout falls back to 1s.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.clone(),
            accept_language: self.accept_language.clone(),
            timeout: Duration::from_secs(self.fetch_timeout_secs.max(1)),
            ..FetchConfig::default()
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("deezbar").join("config.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("deezbar")
            .join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.icons_dir, "assets/icons");
        assert_eq!(config.popup_delay_ms, 500);
        assert_eq!(config.popup_delay(), Duration::from_millis(500));
        assert!(config.user_agent.contains("Mozilla/5.0"));
        assert_eq!(config.fetch_timeout_secs, 15);
    }

    #[test]
    fn config_partial_toml() {
        // Only specify the delay, rest should use defaults.
        let config: Config = toml::from_str("popup_delay_ms = 250").unwrap();
        assert_eq!(config.popup_delay(), Duration::from_millis(250));
        assert_eq!(config.tooltip, "Deezer Player");
        assert_eq!(config.app_icon, "app.png");
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = Config {
            icons_dir: "/opt/deezbar/icons".into(),
            tooltip: "Lecteur Deezer".into(),
            fetch_timeout_secs: 3,
            ..Config::default()
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.icons_dir, "/opt/deezbar/icons");
        assert_eq!(parsed.tooltip, "Lecteur Deezer");
        assert_eq!(parsed.fetch_config().timeout, Duration::from_secs(3));
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let config = Config {
            fetch_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.fetch_config().timeout, Duration::from_secs(1));
    }

    #[test]
    fn app_icon_path_joins_dir() {
        let config = Config::default();
        assert_eq!(
            config.app_icon_path(),
            Path::new("assets/icons").join("app.png")
        );
    }

    #[test]
    fn load_creates_default_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.popup_delay_ms, 500);

        std::fs::write(&path, "tooltip = \"Custom\"").unwrap();
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.tooltip, "Custom");
    }

    #[test]
    fn config_path_not_empty() {
        let path = config_path().unwrap();
        assert!(path.to_string_lossy().contains("deezbar"));
    }
}
