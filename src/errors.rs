// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitelaunchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid command {0}. Must give 'develop' or 'build'.")]
    InvalidMode(String),

    #[error("Could not find the '{0}' executable on PATH or in the local modules directory")]
    ToolNotFound(String),

    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SitelaunchError>;
