// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path, validate it, and anchor it at the
/// directory containing the file.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw_config = load_from_path(path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config.with_project_root(config_root_dir(path)))
}

/// Resolve the config the launcher should run with.
///
/// - An explicit path must exist and parse.
/// - Without one, `Sitelaunch.toml` in the working directory is used if it
///   exists; otherwise built-in defaults apply.
pub fn load_or_default(explicit: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        return load_and_validate(path);
    }

    let path = default_config_path();
    if path.is_file() {
        return load_and_validate(&path);
    }

    debug!(path = %path.display(), "no config file found; using defaults");
    let config = ConfigFile::try_from(RawConfigFile::default())?;
    Ok(config.with_project_root(config_root_dir(&path)))
}

/// Default config file name, looked up in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Sitelaunch.toml")
}

/// Figure out the project root a config file belongs to.
///
/// - If the config path has a non-empty parent (e.g. "site/Sitelaunch.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Sitelaunch.toml" (parent = ""),
///   we fall back to the current working directory ".".
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
