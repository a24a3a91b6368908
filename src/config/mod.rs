use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub stt: SttConfig,
    pub tts: TtsConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JSON file with lessons; the built-in catalog is used when unset
    pub lessons_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// "mock" or "deepgram"
    pub provider: String,
    pub api_key: Option<String>,
    pub api_endpoint: Option<String>,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// "mock" or "google"
    pub provider: String,
    pub api_key: Option<String>,
    pub api_endpoint: Option<String>,
    pub default_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub per_minute: usize,
    pub per_hour: usize,
    pub global_per_hour: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3741,
            lessons_path: None,
        }
    }
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            api_key: None,
            api_endpoint: None,
            language: "el".to_string(),
        }
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            api_key: None,
            api_endpoint: None,
            default_language: "el-GR".to_string(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_minute: 10,
            per_hour: 50,
            global_per_hour: 500,
        }
    }
}

impl Config {
    /// Load the user config (creating a default one on first run), then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save_to(&config_path)?;
            config
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Override settings from deployment variables such as `STT_PROVIDER`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = lookup("STT_PROVIDER") {
            self.stt.provider = provider;
        }
        if let Some(key) = lookup("STT_API_KEY") {
            self.stt.api_key = Some(key);
        }
        if let Some(provider) = lookup("TTS_PROVIDER") {
            self.tts.provider = provider;
        }
        if let Some(key) = lookup("TTS_API_KEY") {
            self.tts.api_key = Some(key);
        }

        let limits = [
            ("STT_RATE_LIMIT_PER_MINUTE", &mut self.rate_limit.per_minute),
            ("STT_RATE_LIMIT_PER_HOUR", &mut self.rate_limit.per_hour),
            (
                "STT_GLOBAL_RATE_LIMIT_PER_HOUR",
                &mut self.rate_limit.global_per_hour,
            ),
        ];
        for (name, target) in limits {
            if let Some(raw) = lookup(name) {
                match raw.trim().parse() {
                    Ok(value) => *target = value,
                    Err(_) => warn!("Ignoring {}={:?}: not a number", name, raw),
                }
            }
        }
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}
