use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read error: {source}")]
    Read {
        #[from]
        source: std::io::Error,
    },

    #[error("TOML parse error: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub monitor: MonitorConfig,
    pub tracker: TrackerConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub default_interval_ms: u64,
    pub event_buffer: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub sample_interval_seconds: u64,
    pub retention_days: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub sound_enabled: bool,
    pub urgency: NotificationUrgency,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationUrgency {
    Low,
    #[default]
    Normal,
    Critical,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            default_interval_ms: 5000,
            event_buffer: 64,
        }
    }
}

impl MonitorConfig {
    pub fn default_interval(&self) -> Duration {
        Duration::from_millis(self.default_interval_ms)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sample_interval_seconds: 2,
            retention_days: 30,
        }
    }
}

impl TrackerConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(self.sample_interval_seconds.max(1))
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound_enabled: true,
            urgency: NotificationUrgency::Normal,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("warden")
            .join("config.toml")
    }

    pub fn data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("warden"))
    }
}
