// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The pipeline talks to a `ProcessBackend` instead of spawning processes
//! directly. `RealProcessBackend` is what the binary uses; tests provide
//! their own implementation that records invocations and decides exit
//! outcomes without starting anything.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::exec::handle::ProcessHandle;
use crate::exec::process_runner::{run_to_completion, spawn_observed};
use crate::exec::spec::ProcessSpec;
use crate::types::{ExitOutcome, ProcessRole};

/// Trait abstracting how the launcher's subprocesses are run.
pub trait ProcessBackend: Send {
    /// Run to completion and report how the process ended.
    fn run_to_completion(
        &mut self,
        role: ProcessRole,
        spec: ProcessSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ExitOutcome>> + Send + '_>>;

    /// Start a process and return its handle immediately.
    ///
    /// Implementations must send exactly one `RuntimeEvent::ProcessExited`
    /// for the process on `runtime_tx` once it has ended.
    fn spawn(
        &mut self,
        role: ProcessRole,
        spec: ProcessSpec,
        runtime_tx: mpsc::Sender<RuntimeEvent>,
    ) -> Result<ProcessHandle>;
}

/// Backend that runs real OS processes via `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct RealProcessBackend;

impl ProcessBackend for RealProcessBackend {
    fn run_to_completion(
        &mut self,
        _role: ProcessRole,
        spec: ProcessSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ExitOutcome>> + Send + '_>> {
        Box::pin(async move { run_to_completion(&spec).await })
    }

    fn spawn(
        &mut self,
        role: ProcessRole,
        spec: ProcessSpec,
        runtime_tx: mpsc::Sender<RuntimeEvent>,
    ) -> Result<ProcessHandle> {
        spawn_observed(role, &spec, runtime_tx)
    }
}
