// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - [`model`] holds the serde structs mirroring `Sitelaunch.toml`.
//! - [`validate`] turns a `RawConfigFile` into a checked `ConfigFile`.
//! - [`loader`] reads TOML from disk.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{config_root_dir, default_config_path, load_and_validate, load_or_default};
pub use model::{BuildSection, ConfigFile, GeneratorSection, PreprocessorSection, RawConfigFile};
