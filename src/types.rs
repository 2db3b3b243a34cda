use std::fmt;
use std::str::FromStr;

use crate::errors::SitelaunchError;

/// Which pipeline to run, parsed from the first positional argument.
///
/// - `Develop`: preprocess once, then keep a content watcher alive next to
///   the generator's dev server.
/// - `Build`: preprocess once, run a one-shot generator build, then copy
///   static assets into the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    Develop,
    Build,
}

impl InvocationMode {
    /// The literal token, also passed as the only argument to the generator.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationMode::Develop => "develop",
            InvocationMode::Build => "build",
        }
    }

    pub fn starts_watcher(&self) -> bool {
        matches!(self, InvocationMode::Develop)
    }

    pub fn copies_assets(&self) -> bool {
        matches!(self, InvocationMode::Build)
    }
}

impl fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvocationMode {
    type Err = SitelaunchError;

    /// Exact match only: no trimming, no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "develop" => Ok(InvocationMode::Develop),
            "build" => Ok(InvocationMode::Build),
            other => Err(SitelaunchError::InvalidMode(format!("{other:?}"))),
        }
    }
}

/// The three subprocesses the launcher manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessRole {
    /// One-shot `preprocess` run.
    Preprocessor,
    /// Long-running `watch` run (develop mode only).
    Watcher,
    /// The site generator (`develop` dev server or `build`).
    Server,
}

impl fmt::Display for ProcessRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProcessRole::Preprocessor => "preprocessor",
            ProcessRole::Watcher => "watcher",
            ProcessRole::Server => "server",
        };
        f.write_str(s)
    }
}

/// How a finished process ended.
///
/// At most one of `code` / `signal` is set in practice: a process killed by
/// a signal has no conventional exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitOutcome {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl ExitOutcome {
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    pub fn signalled(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
        }
    }

    /// Exit code 0 and no signal.
    pub fn is_clean(&self) -> bool {
        self.code == Some(0) && self.signal.is_none()
    }

    /// Best-effort status for our own exit: the code if there is one,
    /// `128 + signal` for signal deaths, 1 if neither is known.
    pub fn exit_code(&self) -> i32 {
        match (self.code, self.signal) {
            (Some(code), _) => code,
            (None, Some(sig)) => 128 + sig,
            (None, None) => 1,
        }
    }

    /// Human-readable name of the terminating signal, if any.
    pub fn signal_name(&self) -> Option<String> {
        self.signal.map(signal_name)
    }
}

impl From<std::process::ExitStatus> for ExitOutcome {
    fn from(status: std::process::ExitStatus) -> Self {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            Self {
                code: status.code(),
                signal: status.signal(),
            }
        }
        #[cfg(not(unix))]
        {
            Self {
                code: status.code(),
                signal: None,
            }
        }
    }
}

#[cfg(unix)]
fn signal_name(sig: i32) -> String {
    match nix::sys::signal::Signal::try_from(sig) {
        Ok(signal) => signal.as_str().to_string(),
        Err(_) => format!("signal {sig}"),
    }
}

#[cfg(not(unix))]
fn signal_name(sig: i32) -> String {
    format!("signal {sig}")
}
