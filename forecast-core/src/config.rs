use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::schedule::Trigger;

/// `[general]` section: logging verbosity and scheduling.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    pub debug: bool,

    /// Cron expression; when absent a single cycle runs at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,
}

/// `[influxdb]` section: connection parameters for the time-series backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InfluxConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 8086,
            database: "weather".to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl InfluxConfig {
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// `[darksky]` section: credential, location and unit system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DarkSkyConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub units: String,
}

impl Default for DarkSkyConfig {
    fn default() -> Self {
        Self {
            key: None,
            latitude: 0.0,
            longitude: 0.0,
            units: "auto".to_string(),
        }
    }
}

/// Top-level configuration, read once at startup.
///
/// Example TOML:
/// ```toml
/// [general]
/// debug = false
/// cron = "*/5 * * * *"
///
/// [influxdb]
/// host = "localhost"
/// port = 8086
/// database = "weather"
///
/// [darksky]
/// key = "..."
/// latitude = 52.37
/// longitude = 4.89
/// units = "si"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub influxdb: InfluxConfig,
    pub darksky: DarkSkyConfig,
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse configuration TOML")
    }

    /// Load and validate config from `path`, or from [`Config::default_path`].
    ///
    /// Unlike an interactive tool there is no useful empty configuration:
    /// a missing file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file in the platform config directory.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-collector")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Startup checks. A missing Dark Sky key is fatal.
    pub fn validate(&self) -> Result<()> {
        self.darksky_key()?;
        self.trigger()?;
        Ok(())
    }

    pub fn darksky_key(&self) -> Result<&str> {
        match self.darksky.key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(anyhow!(
                "DarkSky key should be provided.\n\
                 Hint: set `key` in the [darksky] section or run `forecast-collector configure`."
            )),
        }
    }

    pub fn trigger(&self) -> Result<Trigger> {
        Trigger::from_config(self.general.cron.as_deref())
    }
}
