use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{info, LevelFilter};
use serde::{Deserialize, Deserializer};

use crate::error::{ConfigError, ConfigResult};
use crate::filter::ClientMatch;

const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";
const DEFAULT_EXPORT_DIR: &str = "exports";

/// `log::LevelFilter` that deserializes from plain names, falling back to info.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(pub LevelFilter);

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel(LevelFilter::Info)
    }
}

impl FromStr for LogLevel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.to_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        };
        Ok(LogLevel(level))
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(LogLevel::from_str(&s).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub colored: bool,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub out_dir: PathBuf,
    pub client_match: ClientMatch,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            client_match: ClientMatch::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub export: ExportConfig,
}

impl Config {
    /// Loading order:
    /// 1. `explicit` path, else `DASHBOARD_CONFIG`, else `./dashboard.toml`
    /// 2. Defaults when no file is found (an explicit path must exist)
    /// 3. `DASHBOARD_*` environment overrides
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match Self::config_path(explicit) {
            Some(path) => Self::load_toml(&path)?,
            None => Config::default(),
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var("DASHBOARD_CONFIG") {
            return Some(PathBuf::from(path));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.exists().then_some(default)
    }

    fn load_toml(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        if let Ok(val) = std::env::var("DASHBOARD_LOG_LEVEL") {
            self.logging.level = val.parse().unwrap_or_default();
        }
        if let Ok(val) = std::env::var("DASHBOARD_LOG_COLORED") {
            self.logging.colored = val == "true" || val == "1";
        }
        if let Ok(val) = std::env::var("DASHBOARD_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("DASHBOARD_EXPORT_DIR") {
            self.export.out_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("DASHBOARD_CLIENT_MATCH") {
            self.export.client_match = val.parse().map_err(ConfigError::invalid)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.export.out_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("export.out_dir cannot be empty"));
        }
        Ok(())
    }

    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  logging: {} (colored: {})",
            self.logging.level.0, self.logging.colored
        );
        info!(
            "  export: {} (client match: {:?})",
            self.export.out_dir.display(),
            self.export.client_match
        );
    }
}
