// src/locate/mod.rs

//! Finding the site-generator executable.
//!
//! Lookup order:
//! 1. a command with the generator's name on the search path (`PATH`);
//! 2. a known entry script inside the project-local modules directory.
//!
//! The first hit wins; there is no ranking beyond declaration order.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::config::ConfigFile;
use crate::fs::FileSystem;

/// Entry-script locations tried inside each candidate package, in order.
const ENTRY_SCRIPTS: &[&str] = &["bin/{name}.js", "cli/bin/{name}.js"];

/// A resolved generator executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolLocation {
    /// Bare command name; the OS resolves it at spawn time.
    Command(String),
    /// Entry script found in the local modules directory.
    Script(PathBuf),
}

impl ToolLocation {
    /// What to hand to `Command::new`.
    pub fn program(&self) -> &OsStr {
        match self {
            ToolLocation::Command(name) => OsStr::new(name),
            ToolLocation::Script(path) => path.as_os_str(),
        }
    }
}

impl fmt::Display for ToolLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolLocation::Command(name) => f.write_str(name),
            ToolLocation::Script(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolves the generator executable from the environment and the
/// project-local modules directory.
#[derive(Debug)]
pub struct ToolLocator<'a> {
    fs: &'a dyn FileSystem,
    tool: String,
    modules_dir: PathBuf,
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl<'a> ToolLocator<'a> {
    pub fn new(fs: &'a dyn FileSystem, tool: impl Into<String>, modules_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            tool: tool.into(),
            modules_dir: modules_dir.into(),
            search_path: std::env::var_os("PATH"),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Locator for the generator named in `cfg`.
    pub fn from_config(fs: &'a dyn FileSystem, cfg: &ConfigFile) -> Self {
        Self::new(fs, cfg.generator().name.clone(), cfg.modules_dir())
    }

    /// Override the directories probed for a bare command (defaults to `PATH`).
    pub fn with_search_path(mut self, search_path: Option<OsString>) -> Self {
        self.search_path = search_path;
        self
    }

    pub fn tool_name(&self) -> &str {
        &self.tool
    }

    /// Resolve the generator, or `None` if neither lookup finds it.
    pub fn locate(&self) -> Option<ToolLocation> {
        if self.on_search_path() {
            debug!(tool = %self.tool, "found generator on search path");
            return Some(ToolLocation::Command(self.tool.clone()));
        }

        if !self.fs.is_dir(&self.modules_dir) {
            debug!(
                tool = %self.tool,
                modules_dir = %self.modules_dir.display(),
                "generator not on search path and no modules directory"
            );
            return None;
        }

        let found = self
            .local_candidates()
            .into_iter()
            .find(|candidate| self.fs.is_file(candidate));

        match &found {
            Some(path) => debug!(tool = %self.tool, path = %path.display(), "found local generator script"),
            None => debug!(tool = %self.tool, "no local generator script found"),
        }

        found.map(ToolLocation::Script)
    }

    /// Candidate entry scripts in lookup order: the plain package first,
    /// then its `@`-scoped variant, each with every entry-script location.
    pub fn local_candidates(&self) -> Vec<PathBuf> {
        let packages = [self.tool.clone(), format!("@{}", self.tool)];

        packages
            .iter()
            .flat_map(|package| {
                ENTRY_SCRIPTS.iter().map(move |rel| {
                    self.modules_dir
                        .join(package)
                        .join(rel.replace("{name}", &self.tool))
                })
            })
            .collect()
    }

    fn on_search_path(&self) -> bool {
        match &self.search_path {
            Some(paths) => which::which_in(&self.tool, Some(paths), &self.cwd).is_ok(),
            None => false,
        }
    }
}
