// src/exec/spec.rs

use std::ffi::{OsStr, OsString};
use std::process::Stdio;

use tokio::process::Command;

/// A program plus its argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: OsString,
    pub args: Vec<String>,
}

impl ProcessSpec {
    pub fn new(program: impl AsRef<OsStr>, args: Vec<String>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args,
        }
    }

    /// Space-joined rendering used for `$ <cmd>` echo lines and reports.
    pub fn command_line(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.to_string_lossy().into_owned());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Build a command whose standard streams are shared with ours.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }
}
