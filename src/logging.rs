// src/logging.rs

//! Launcher diagnostics on stderr.
//!
//! The preprocessor, watcher and generator all write straight to the
//! terminal we share with them, so our own events are kept short (no
//! targets, no thread info) to stay readable between their lines. The
//! `$ <cmd>` echo lines are ordinary `info` events, which is why `info` is
//! the default: lowering the level to `warn` silences the echoes but keeps
//! failure reports.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Consulted when `--log-level` is absent.
pub const LOG_ENV_VAR: &str = "SITELAUNCH_LOG";

/// Install the global subscriber. Call once, before the pipeline starts.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_level = std::env::var(LOG_ENV_VAR).ok();
    let level = resolve_level(cli_level, env_level.as_deref());

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// The flag wins over the environment; an unreadable env value falls back
/// to `info`.
pub fn resolve_level(cli_level: Option<LogLevel>, env_level: Option<&str>) -> Level {
    if let Some(lvl) = cli_level {
        return match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        };
    }
    env_level.and_then(parse_level_str).unwrap_or(Level::INFO)
}

/// Parse a level name as accepted by `SITELAUNCH_LOG`.
pub fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
