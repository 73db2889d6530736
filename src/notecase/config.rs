use crate::error::{NotecaseError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const HOME_ENV: &str = "NOTECASE_HOME";
const DEFAULT_TOAST_MS: u64 = 3000;
const DEFAULT_ACCENT_VARIANTS: usize = 4;
const DEFAULT_PREVIEW_ENDPOINT: &str = "https://api.linkpreview.net/";
const DEFAULT_PREVIEW_TIMEOUT_MS: u64 = 5000;
const DEFAULT_API_KEY_ENV: &str = "NOTECASE_PREVIEW_KEY";

/// Keys understood by [`NotecaseConfig::get`] and [`NotecaseConfig::set`].
pub const CONFIG_KEYS: &[&str] = &[
    "toast_duration_ms",
    "accent_variants",
    "preview.enabled",
    "preview.endpoint",
    "preview.timeout_ms",
    "preview.api_key_env",
];

/// Configuration for notecase, stored in `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotecaseConfig {
    /// How long the deletion toast stays up.
    #[serde(default = "default_toast_ms")]
    pub toast_duration_ms: u64,

    /// Number of accent styles notes cycle through in the collection view.
    #[serde(default = "default_accent_variants")]
    pub accent_variants: usize,

    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreviewConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_preview_timeout_ms")]
    pub timeout_ms: u64,

    /// Name of the environment variable holding the service key.
    /// The key itself never lives in this file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_toast_ms() -> u64 {
    DEFAULT_TOAST_MS
}

fn default_accent_variants() -> usize {
    DEFAULT_ACCENT_VARIANTS
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    DEFAULT_PREVIEW_ENDPOINT.to_string()
}

fn default_preview_timeout_ms() -> u64 {
    DEFAULT_PREVIEW_TIMEOUT_MS
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

impl Default for NotecaseConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: DEFAULT_TOAST_MS,
            accent_variants: DEFAULT_ACCENT_VARIANTS,
            preview: PreviewConfig::default(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            timeout_ms: DEFAULT_PREVIEW_TIMEOUT_MS,
            api_key_env: default_api_key_env(),
        }
    }
}

impl PreviewConfig {
    /// Reads the service key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

impl NotecaseConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: NotecaseConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "toast_duration_ms" => Some(self.toast_duration_ms.to_string()),
            "accent_variants" => Some(self.accent_variants.to_string()),
            "preview.enabled" => Some(self.preview.enabled.to_string()),
            "preview.endpoint" => Some(self.preview.endpoint.clone()),
            "preview.timeout_ms" => Some(self.preview.timeout_ms.to_string()),
            "preview.api_key_env" => Some(self.preview.api_key_env.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "toast_duration_ms" => self.toast_duration_ms = parse_number(key, value)?,
            "accent_variants" => {
                let variants: usize = parse_number(key, value)?;
                if variants == 0 {
                    return Err(NotecaseError::Config(
                        "accent_variants must be at least 1".to_string(),
                    ));
                }
                self.accent_variants = variants;
            }
            "preview.enabled" => {
                self.preview.enabled = value.parse().map_err(|_| {
                    NotecaseError::Config(format!(
                        "{} expects true or false, got '{}'",
                        key, value
                    ))
                })?
            }
            "preview.endpoint" => {
                url::Url::parse(value).map_err(|e| {
                    NotecaseError::Config(format!("invalid endpoint '{}': {}", value, e))
                })?;
                self.preview.endpoint = value.to_string();
            }
            "preview.timeout_ms" => self.preview.timeout_ms = parse_number(key, value)?,
            "preview.api_key_env" => {
                if value.is_empty() {
                    return Err(NotecaseError::Config(
                        "preview.api_key_env cannot be empty".to_string(),
                    ));
                }
                self.preview.api_key_env = value.to_string();
            }
            _ => {
                return Err(NotecaseError::Config(format!(
                    "Unknown config key: {} (known keys: {})",
                    key,
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn parse_number<N: std::str::FromStr>(key: &str, value: &str) -> Result<N> {
    value.parse().map_err(|_| {
        NotecaseError::Config(format!("{} expects a whole number, got '{}'", key, value))
    })
}

/// Where `config.json` lives: `$NOTECASE_HOME`, else the platform config dir.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(home) = env::var_os(HOME_ENV).filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    directories::ProjectDirs::from("com", "notecase", "notecase")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            NotecaseError::Config(format!(
                "could not determine a config directory; set ${}",
                HOME_ENV
            ))
        })
}
