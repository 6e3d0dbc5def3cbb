use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid project status: {value}")]
    InvalidProjectStatus { value: String },

    #[error("Invalid mood: {value}")]
    InvalidMood { value: String },

    #[error("Invalid availability: {value}")]
    InvalidAvailability { value: String },

    #[error("Invalid export format: {value}")]
    InvalidExportFormat { value: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config error: {message}")]
    Invalid { message: String },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        ConfigError::Invalid {
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
