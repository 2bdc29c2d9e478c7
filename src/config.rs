//! Application configuration management.
//!
//! Configuration is layered with `figment`:
//!
//! 1. Built-in defaults
//! 2. TOML config file (platform config dir, or `--config PATH`)
//! 3. `POLARIS_*` environment variables (`__` separates nested keys)
//! 4. CLI flags, applied with [`Config::merge_cli`]
//!
//! An unreadable or invalid file never stops the viewer; the layers below it
//! are used instead and a warning is logged.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::{Cli, ThemeArg};
use crate::gate::Credential;
use crate::nav::ActivationWindow;
use crate::tui::keybindings::KeybindingProfile;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "POLARIS_";

/// Action name to key specifications, e.g. `quit = ["q", "Ctrl+c"]`.
pub type CustomKeybindings = HashMap<String, Vec<String>>;

/// Errors from loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The layered sources could not be merged into a [`Config`].
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// The platform config directory could not be determined.
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    /// Serializing to TOML failed.
    #[error("could not serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading or writing the file failed.
    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Accessibility options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityConfig {
    /// Plain markers instead of color-only cues.
    pub enabled: bool,
    /// ASCII borders instead of box-drawing characters.
    pub use_ascii_borders: bool,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preferred TUI theme.
    pub theme: ThemeArg,
    /// Keybinding preset.
    pub keybinding_profile: KeybindingProfile,
    /// Extra keys per action, merged over the preset.
    pub custom_keybindings: CustomKeybindings,
    /// Accessibility options.
    pub accessibility: AccessibilityConfig,
    /// The credential pair the session gate accepts.
    pub credential: Credential,
    /// Simulated credential-check latency in milliseconds.
    pub login_delay_ms: u64,
    /// Rows below the viewport top in which a section becomes active.
    pub spy_window_rows: u16,
    /// Rows moved per frame while smooth-scrolling to a section.
    pub scroll_step_rows: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeArg::Auto,
            keybinding_profile: KeybindingProfile::Universal,
            custom_keybindings: HashMap::new(),
            accessibility: AccessibilityConfig::default(),
            credential: Credential::default(),
            login_delay_ms: 1500,
            spy_window_rows: 8,
            scroll_step_rows: 3,
        }
    }
}

impl Config {
    /// Load configuration from the default path, or `path` if given.
    ///
    /// Falls back to defaults plus environment overrides when the file is
    /// missing or invalid.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).or_else(|| Self::default_path().ok());
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::figment(None).extract().unwrap_or_else(|e| {
                log::warn!("Ignoring invalid environment configuration: {}", e);
                Self::default()
            }),
        }
    }

    /// Load configuration from a specific TOML file.
    pub fn load_from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::try_load_from_path(&path) {
            Ok(config) => {
                log::debug!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::figment(None).extract().unwrap_or_default()
            }
        }
    }

    /// Load configuration from a specific TOML file, reporting failures.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the file or environment contain
    /// values that do not fit the schema.
    pub fn try_load_from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::figment(Some(path))
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Apply CLI flags over the loaded values.
    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(theme) = cli.theme {
            self.theme = theme;
        }
        if let Some(profile) = cli.keybinding_profile {
            self.keybinding_profile = profile;
        }
        if cli.accessible {
            self.accessibility.enabled = true;
            self.accessibility.use_ascii_borders = true;
        }
    }

    /// Credential-check delay as a [`Duration`].
    #[must_use]
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    /// Scroll-spy activation window in rows.
    #[must_use]
    pub fn spy_window(&self) -> ActivationWindow {
        ActivationWindow::new(0, i64::from(self.spy_window_rows.max(1)))
    }

    /// Save the configuration as TOML to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Save the configuration to the default platform-specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory is unknown or writing fails.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(&Self::default_path()?)
    }

    /// Get the default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if no home directory is known.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("com", "polaris", "polaris").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.theme, ThemeArg::Auto);
        assert_eq!(config.keybinding_profile, KeybindingProfile::Universal);
        assert_eq!(config.login_delay(), Duration::from_millis(1500));
        assert_eq!(config.spy_window(), ActivationWindow::new(0, 8));
        assert_eq!(config.credential, Credential::default());
    }

    #[test]
    fn test_spy_window_never_empty() {
        let config = Config {
            spy_window_rows: 0,
            ..Config::default()
        };
        assert_eq!(config.spy_window(), ActivationWindow::new(0, 1));
    }

    #[test]
    fn test_merge_cli_overrides() {
        use clap::Parser;
        let cli = Cli::try_parse_from([
            "polaris",
            "--theme",
            "dark",
            "--keybinding-profile",
            "standard",
            "--accessible",
        ])
        .unwrap();
        let mut config = Config::default();
        config.merge_cli(&cli);

        assert_eq!(config.theme, ThemeArg::Dark);
        assert_eq!(config.keybinding_profile, KeybindingProfile::Standard);
        assert!(config.accessibility.enabled);
        assert!(config.accessibility.use_ascii_borders);
    }

    #[test]
    fn test_merge_cli_keeps_values_without_flags() {
        use clap::Parser;
        let cli = Cli::try_parse_from(["polaris"]).unwrap();
        let mut config = Config {
            theme: ThemeArg::Light,
            ..Config::default()
        };
        config.merge_cli(&cli);
        assert_eq!(config.theme, ThemeArg::Light);
        assert!(!config.accessibility.enabled);
    }
}
