// src/exec/handle.rs

use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::types::ProcessRole;

/// Handle for a spawned, still-observed process.
///
/// - `terminate` is used to ask the observing task to signal the process.
///   The exit itself is still reported through the usual
///   `RuntimeEvent::ProcessExited`, exactly once.
#[derive(Debug)]
pub struct ProcessHandle {
    role: ProcessRole,
    command_line: String,
    pid: Option<u32>,
    terminate: Option<oneshot::Sender<()>>,
}

impl ProcessHandle {
    pub fn new(
        role: ProcessRole,
        command_line: impl Into<String>,
        pid: Option<u32>,
        terminate: oneshot::Sender<()>,
    ) -> Self {
        Self {
            role,
            command_line: command_line.into(),
            pid,
            terminate: Some(terminate),
        }
    }

    pub fn role(&self) -> ProcessRole {
        self.role
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Request termination without waiting for it to take effect.
    ///
    /// Returns `false` if a request was already sent or the process had
    /// already exited.
    pub fn terminate(&mut self) -> bool {
        let Some(tx) = self.terminate.take() else {
            debug!(
                role = %self.role,
                "termination already requested; ignoring"
            );
            return false;
        };

        info!(role = %self.role, pid = ?self.pid, "requesting termination");
        if tx.send(()).is_err() {
            debug!(
                role = %self.role,
                "process already finished while requesting termination"
            );
            return false;
        }
        true
    }
}
