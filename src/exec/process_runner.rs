// src/exec/process_runner.rs

//! Running subprocesses, either to completion or observed in the background.

use tokio::process::Child;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::engine::RuntimeEvent;
use crate::errors::{Result, SitelaunchError};
use crate::exec::handle::ProcessHandle;
use crate::exec::spec::ProcessSpec;
use crate::types::{ExitOutcome, ProcessRole};

/// Run `spec` with inherited stdio and wait for it to finish.
///
/// Exit code 0, a nonzero code and a signal death are all reported through
/// the returned `ExitOutcome`; only a failure to start is an `Err`.
pub async fn run_to_completion(spec: &ProcessSpec) -> Result<ExitOutcome> {
    let command = spec.command_line();
    debug!(cmd = %command, "running process to completion");

    let status = spec
        .to_command()
        .status()
        .await
        .map_err(|source| SitelaunchError::Spawn {
            command: command.clone(),
            source,
        })?;

    let outcome = ExitOutcome::from(status);
    debug!(cmd = %command, ?outcome, "process finished");
    Ok(outcome)
}

/// Start `spec` and return immediately.
///
/// A background task waits for the child and sends exactly one
/// `RuntimeEvent::ProcessExited` for it, whether it exits on its own or
/// after [`ProcessHandle::terminate`].
pub fn spawn_observed(
    role: ProcessRole,
    spec: &ProcessSpec,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<ProcessHandle> {
    let command = spec.command_line();

    let child = spec
        .to_command()
        .spawn()
        .map_err(|source| SitelaunchError::Spawn {
            command: command.clone(),
            source,
        })?;

    let pid = child.id();
    info!(%role, pid = ?pid, cmd = %command, "started process");

    let (terminate_tx, terminate_rx) = oneshot::channel::<()>();
    let observed = command.clone();
    tokio::spawn(async move {
        observe_child(role, observed, child, terminate_rx, runtime_tx).await;
    });

    Ok(ProcessHandle::new(role, command, pid, terminate_tx))
}

async fn observe_child(
    role: ProcessRole,
    command: String,
    mut child: Child,
    mut terminate_rx: oneshot::Receiver<()>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) {
    // Either the process exits on its own, or termination is requested and
    // we keep waiting for the (now signalled) process to go away.
    let status = tokio::select! {
        status = child.wait() => status,

        request = &mut terminate_rx => {
            match request {
                Ok(()) => send_terminate(role, &mut child),
                Err(_) => debug!(%role, "handle dropped without requesting termination"),
            }
            child.wait().await
        }
    };

    let outcome = match status {
        Ok(status) => ExitOutcome::from(status),
        Err(e) => {
            error!(%role, error = %e, "failed waiting for process");
            ExitOutcome::default()
        }
    };

    info!(
        %role,
        exit_code = ?outcome.code,
        signal = ?outcome.signal,
        "process exited"
    );

    if runtime_tx
        .send(RuntimeEvent::ProcessExited {
            role,
            command,
            outcome,
        })
        .await
        .is_err()
    {
        debug!(%role, "runtime no longer listening for process exits");
    }
}

/// Deliver SIGTERM (the conventional "please stop" signal).
#[cfg(unix)]
fn send_terminate(role: ProcessRole, child: &mut Child) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        debug!(%role, "process already reaped; nothing to terminate");
        return;
    };

    let Ok(raw) = i32::try_from(pid) else {
        warn!(%role, pid, "pid out of range; cannot signal");
        return;
    };

    if let Err(e) = kill(Pid::from_raw(raw), Signal::SIGTERM) {
        warn!(%role, pid, error = %e, "failed to send SIGTERM");
    }
}

#[cfg(not(unix))]
fn send_terminate(role: ProcessRole, child: &mut Child) {
    if let Err(e) = child.start_kill() {
        warn!(%role, error = %e, "failed to kill process");
    }
}
