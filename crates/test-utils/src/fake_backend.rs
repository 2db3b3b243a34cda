use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot, Notify};
use tracing::debug;

use sitelaunch::engine::RuntimeEvent;
use sitelaunch::errors::{Result, SitelaunchError};
use sitelaunch::exec::{ProcessBackend, ProcessHandle, ProcessSpec};
use sitelaunch::types::{ExitOutcome, ProcessRole};

/// SIGTERM on every unix we care about.
pub const SIGTERM: i32 = 15;

/// How a process was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    RunToCompletion,
    Spawned,
}

/// One recorded process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub role: ProcessRole,
    pub kind: InvocationKind,
    pub spec: ProcessSpec,
}

#[derive(Default)]
struct Shared {
    invocations: Mutex<Vec<Invocation>>,
    exit_senders: Mutex<HashMap<ProcessRole, oneshot::Sender<ExitOutcome>>>,
    terminated: Mutex<Vec<ProcessRole>>,
    spawned: Notify,
}

/// A fake backend that:
/// - records every process start
/// - returns a scripted outcome for run-to-completion calls
/// - keeps spawned processes "running" until the test (or a script) ends
///   them, or until they are terminated through their handle.
pub struct FakeBackend {
    shared: Arc<Shared>,
    run_outcome: ExitOutcome,
    scripted_exits: HashMap<ProcessRole, ExitOutcome>,
    terminate_outcome: ExitOutcome,
    fail_spawn: Option<ProcessRole>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            run_outcome: ExitOutcome::exited(0),
            scripted_exits: HashMap::new(),
            terminate_outcome: ExitOutcome::signalled(SIGTERM),
            fail_spawn: None,
        }
    }

    /// Outcome of every run-to-completion call (the preprocessor).
    pub fn with_run_outcome(mut self, outcome: ExitOutcome) -> Self {
        self.run_outcome = outcome;
        self
    }

    /// Make the process with `role` exit with `outcome` as soon as it starts.
    pub fn with_exit_on_spawn(mut self, role: ProcessRole, outcome: ExitOutcome) -> Self {
        self.scripted_exits.insert(role, outcome);
        self
    }

    /// How a terminated process reports its exit (default: SIGTERM death).
    pub fn with_terminate_outcome(mut self, outcome: ExitOutcome) -> Self {
        self.terminate_outcome = outcome;
        self
    }

    /// Fail to start the process with `role`.
    pub fn with_spawn_failure(mut self, role: ProcessRole) -> Self {
        self.fail_spawn = Some(role);
        self
    }

    /// Handle for observing and steering processes while the pipeline runs.
    pub fn controller(&self) -> FakeController {
        FakeController {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessBackend for FakeBackend {
    fn run_to_completion(
        &mut self,
        role: ProcessRole,
        spec: ProcessSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ExitOutcome>> + Send + '_>> {
        self.shared.invocations.lock().unwrap().push(Invocation {
            role,
            kind: InvocationKind::RunToCompletion,
            spec,
        });
        let outcome = self.run_outcome;
        Box::pin(async move { Ok(outcome) })
    }

    fn spawn(
        &mut self,
        role: ProcessRole,
        spec: ProcessSpec,
        runtime_tx: mpsc::Sender<RuntimeEvent>,
    ) -> Result<ProcessHandle> {
        let command = spec.command_line();
        if self.fail_spawn == Some(role) {
            debug!(%role, cmd = %command, "fake backend: failing spawn");
            return Err(SitelaunchError::Spawn {
                command,
                source: io::Error::new(io::ErrorKind::NotFound, "fake spawn failure"),
            });
        }

        self.shared.invocations.lock().unwrap().push(Invocation {
            role,
            kind: InvocationKind::Spawned,
            spec,
        });

        let (exit_tx, exit_rx) = oneshot::channel::<ExitOutcome>();
        let (terminate_tx, terminate_rx) = oneshot::channel::<()>();

        match self.scripted_exits.get(&role) {
            Some(outcome) => {
                let _ = exit_tx.send(*outcome);
            }
            None => {
                self.shared.exit_senders.lock().unwrap().insert(role, exit_tx);
            }
        }

        let shared = Arc::clone(&self.shared);
        let terminate_outcome = self.terminate_outcome;
        let reported = command.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                exited = exit_rx => exited.unwrap_or(terminate_outcome),
                request = terminate_rx => match request {
                    Ok(()) => {
                        debug!(%role, "fake backend: terminated");
                        shared.terminated.lock().unwrap().push(role);
                        terminate_outcome
                    }
                    Err(_) => terminate_outcome,
                },
            };
            let _ = runtime_tx
                .send(RuntimeEvent::ProcessExited {
                    role,
                    command: reported,
                    outcome,
                })
                .await;
        });

        debug!(%role, cmd = %command, "fake backend: spawned");
        self.shared.spawned.notify_waiters();
        Ok(ProcessHandle::new(role, command, None, terminate_tx))
    }
}

/// Test-side view of a [`FakeBackend`].
#[derive(Clone)]
pub struct FakeController {
    shared: Arc<Shared>,
}

impl FakeController {
    pub fn invocations(&self) -> Vec<Invocation> {
        self.shared.invocations.lock().unwrap().clone()
    }

    pub fn invocations_of(&self, role: ProcessRole) -> Vec<Invocation> {
        self.invocations()
            .into_iter()
            .filter(|i| i.role == role)
            .collect()
    }

    pub fn was_started(&self, role: ProcessRole) -> bool {
        !self.invocations_of(role).is_empty()
    }

    /// Roles whose processes were terminated through their handle.
    pub fn terminated(&self) -> Vec<ProcessRole> {
        self.shared.terminated.lock().unwrap().clone()
    }

    /// Wait until a process with `role` has been spawned.
    pub async fn wait_for_spawn(&self, role: ProcessRole) {
        loop {
            let notified = self.shared.spawned.notified();
            if self
                .invocations_of(role)
                .iter()
                .any(|i| i.kind == InvocationKind::Spawned)
            {
                return;
            }
            notified.await;
        }
    }

    /// End a running process with `outcome`.
    ///
    /// Panics if no such process is waiting for an exit.
    pub fn exit(&self, role: ProcessRole, outcome: ExitOutcome) {
        let sender = self
            .shared
            .exit_senders
            .lock()
            .unwrap()
            .remove(&role)
            .unwrap_or_else(|| panic!("no running {role} process to exit"));
        let _ = sender.send(outcome);
    }
}
