//src/config.rs
use comfy_table::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

use crate::toast::ToastConfig;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_CONFIG_DIR: &str = "fitness-planner";
const CONFIG_ENV_VAR: &str = "FITNESS_PLANNER_CONFIG_DIR"; // Environment variable name

pub const DEFAULT_BASE_URL: &str = "https://api.dify.ai/v1";
pub const DEFAULT_USER: &str = "user-123";

// First non-empty variable wins. The NEXT_PUBLIC_ names are what the hosted
// page was deployed with.
const BASE_URL_ENV_VARS: [&str; 2] = ["DIFY_BASE_URL", "NEXT_PUBLIC_DIFY_BASE_URL"];
const API_KEY_ENV_VARS: [&str; 2] = ["DIFY_API_KEY", "NEXT_PUBLIC_DIFY_API_KEY"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine configuration directory.")]
    CannotDetermineConfigDir,
    #[error("I/O error accessing config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file (TOML): {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize config data (TOML): {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid color name: {0}")]
    InvalidColor(String),
    #[error("Invalid base URL '{0}'. Expected an http:// or https:// URL.")]
    InvalidBaseUrl(String),
    #[error("API key cannot be empty. Use 'config clear-api-key' to remove it.")]
    EmptyApiKey,
}

// Define standard colors using strum for easy iteration/parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum StandardColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    DarkGrey,
    DarkRed,
    DarkGreen,
    DarkYellow,
    DarkBlue,
    DarkMagenta,
    DarkCyan,
    Grey,
}

// Helper to convert our enum to comfy_table::Color
impl From<StandardColor> for Color {
    fn from(value: StandardColor) -> Self {
        match value {
            StandardColor::Black => Self::Black,
            StandardColor::Red => Self::Red,
            StandardColor::Green => Self::Green,
            StandardColor::Yellow => Self::Yellow,
            StandardColor::Blue => Self::Blue,
            StandardColor::Magenta => Self::Magenta,
            StandardColor::Cyan => Self::Cyan,
            StandardColor::White => Self::White,
            StandardColor::DarkGrey => Self::DarkGrey,
            StandardColor::DarkRed => Self::DarkRed,
            StandardColor::DarkGreen => Self::DarkGreen,
            StandardColor::DarkYellow => Self::DarkYellow,
            StandardColor::DarkBlue => Self::DarkBlue,
            StandardColor::DarkMagenta => Self::DarkMagenta,
            StandardColor::DarkCyan => Self::DarkCyan,
            StandardColor::Grey => Self::Grey,
        }
    }
}

/// Parses a colour name case-insensitively.
/// # Errors
/// Returns `ConfigError::InvalidColor` for unknown names.
pub fn parse_color(color_str: &str) -> Result<StandardColor, ConfigError> {
    for color in StandardColor::iter() {
        if format!("{color:?}").eq_ignore_ascii_case(color_str) {
            return Ok(color);
        }
    }
    Err(ConfigError::InvalidColor(color_str.to_string()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)] // Ensure defaults are used if fields are missing
pub struct Theme {
    pub header_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_color: "Green".to_string(),
        }
    }
}

/// Connection settings for the hosted workflow API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Fixed end-user identifier sent with every run.
    pub user: String,
    /// No timeout unless set; a stuck request then keeps the form loading.
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            user: DEFAULT_USER.to_string(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Applies `DIFY_BASE_URL` / `DIFY_API_KEY` from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(*name))
                .find(|value| !value.trim().is_empty())
        };
        if let Some(base_url) = first_set(&BASE_URL_ENV_VARS[..]) {
            self.base_url = base_url;
        }
        if let Some(api_key) = first_set(&API_KEY_ENV_VARS[..]) {
            self.api_key = Some(api_key);
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)] // Ensure defaults are used if fields are missing
pub struct Config {
    pub api: ApiConfig,
    pub toasts: ToastConfig,

    // Theming
    pub theme: Theme,
}

/// Determines the path to the configuration file.
/// Exposed at crate root as `get_config_path_util`
/// # Errors
/// Returns `ConfigError` if no directory can be determined or created.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir_override = std::env::var(CONFIG_ENV_VAR).ok();

    let config_dir_path = if let Some(path_str) = config_dir_override {
        let path = PathBuf::from(path_str);
        if !path.is_dir() {
            tracing::warn!(
                "Environment variable {} points to '{}', which is not a directory. Trying to create it.",
                CONFIG_ENV_VAR,
                path.display()
            );
            fs::create_dir_all(&path)?;
        }
        path
    } else {
        let base_config_dir = dirs::config_dir().ok_or(ConfigError::CannotDetermineConfigDir)?;
        base_config_dir.join(APP_CONFIG_DIR)
    };

    if !config_dir_path.exists() {
        fs::create_dir_all(&config_dir_path)?;
    }

    Ok(config_dir_path.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from the TOML file at the given path.
/// Writes a default file first if none exists.
/// # Errors
/// Returns `ConfigError` on I/O or TOML errors.
pub fn load(config_path: &Path) -> Result<Config, ConfigError> {
    if config_path.exists() {
        let config_content = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    } else {
        let default_config = Config::default();
        save(config_path, &default_config)?;
        Ok(default_config)
    }
}

/// Saves the configuration to the TOML file.
/// # Errors
/// Returns `ConfigError` on I/O or serialization errors.
pub fn save(config_path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    let config_content = toml::to_string_pretty(config)?;
    fs::write(config_path, config_content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_overrides_take_precedence() {
        let api = ApiConfig {
            base_url: "https://file.example/v1".into(),
            api_key: Some("from-file".into()),
            ..Default::default()
        }
        .with_overrides(lookup_from(&[
            ("DIFY_BASE_URL", "http://localhost:5001/v1"),
            ("NEXT_PUBLIC_DIFY_API_KEY", "app-secret"),
        ]));
        assert_eq!(api.base_url, "http://localhost:5001/v1");
        assert_eq!(api.api_key.as_deref(), Some("app-secret"));
        assert_eq!(api.user, "user-123");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let api = ApiConfig::default().with_overrides(lookup_from(&[
            ("DIFY_BASE_URL", "  "),
            ("DIFY_API_KEY", ""),
        ]));
        assert_eq!(api, ApiConfig::default());
    }

    #[test]
    fn load_creates_default_file_and_round_trips() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let loaded = load(&path)?;
        assert_eq!(loaded, Config::default());
        assert!(path.exists());

        let mut changed = loaded;
        changed.api.api_key = Some("app-123".into());
        changed.toasts.capacity = 3;
        save(&path, &changed)?;
        assert_eq!(load(&path)?, changed);
        Ok(())
    }

    #[test]
    fn partial_file_falls_back_to_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[api]\ntimeout_secs = 30\n")?;
        let config = load(&path)?;
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.toasts, ToastConfig::default());
        Ok(())
    }

    #[test]
    fn parse_color_is_case_insensitive() {
        assert_eq!(parse_color("darkblue").ok(), Some(StandardColor::DarkBlue));
        assert!(matches!(
            parse_color("chartreuse"),
            Err(ConfigError::InvalidColor(_))
        ));
    }
}
