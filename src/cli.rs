// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Options are only recognised *before* the mode token. Everything after it
//! is captured verbatim and forwarded to the preprocessor.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `sitelaunch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sitelaunch",
    version,
    about = "Preprocess site content, then run the static-site generator in develop or build mode.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Sitelaunch.toml` in the current working directory; built-in
    /// defaults are used if that file does not exist.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SITELAUNCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve config and tools, print the commands, but don't start anything.
    #[arg(long)]
    pub dry_run: bool,

    /// `develop` or `build`.
    ///
    /// Kept as a free string so that an unknown value is reported by the
    /// launcher itself (exit status 1) rather than as a usage error.
    #[arg(value_name = "MODE")]
    pub mode: Option<String>,

    /// Arguments forwarded unchanged to the preprocessor.
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub passthrough: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
