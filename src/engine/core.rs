// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s for the long-running processes and produces:
//! - an updated core state (which processes are alive, the exit-code register)
//! - a list of commands describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Runtime`) owns the process handles and
//! the asset copier; the core never touches processes or the filesystem.

use crate::engine::RuntimeEvent;
use crate::engine::event_handlers::{CoreStep, handle_server_exit, handle_watcher_exit};
use crate::types::{InvocationMode, ProcessRole};

/// Where the launcher is in its lifecycle once the long-running processes
/// have been started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Generator (and watcher, in develop mode) running.
    Running,
    /// The watcher died and the generator has been asked to stop.
    Terminating,
    /// Nothing left to wait for.
    Done,
}

/// Mutable state shared by the event handlers.
#[derive(Debug)]
pub struct CoreState {
    pub mode: InvocationMode,
    pub watcher_alive: bool,
    pub server_alive: bool,
    /// Set once the watcher's exit forced the generator down; the
    /// generator's own exit must not overwrite the watcher's code after that.
    pub server_terminated_by_watcher: bool,
    /// The launcher's own exit status: last value assigned wins.
    pub exit_code: i32,
}

impl CoreState {
    pub fn is_idle(&self) -> bool {
        !self.watcher_alive && !self.server_alive
    }
}

/// Pure core runtime.
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    state: CoreState,
}

impl CoreRuntime {
    /// Core for a pipeline whose generator has been started, and whose
    /// watcher has been started iff `watcher_started`.
    pub fn new(mode: InvocationMode, watcher_started: bool) -> Self {
        Self {
            state: CoreState {
                mode,
                watcher_alive: watcher_started,
                server_alive: true,
                server_terminated_by_watcher: false,
                exit_code: 0,
            },
        }
    }

    /// Current value of the exit-code register.
    pub fn exit_code(&self) -> i32 {
        self.state.exit_code
    }

    pub fn phase(&self) -> Phase {
        if self.state.is_idle() {
            Phase::Done
        } else if self.state.server_terminated_by_watcher {
            Phase::Terminating
        } else {
            Phase::Running
        }
    }

    pub fn watcher_alive(&self) -> bool {
        self.state.watcher_alive
    }

    pub fn server_alive(&self) -> bool {
        self.state.server_alive
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::ProcessExited {
                role: ProcessRole::Server,
                command,
                outcome,
            } => handle_server_exit(&mut self.state, &command, outcome),
            RuntimeEvent::ProcessExited {
                role: ProcessRole::Watcher,
                command,
                outcome,
            } => handle_watcher_exit(&mut self.state, &command, outcome),
            RuntimeEvent::ProcessExited {
                role: ProcessRole::Preprocessor,
                ..
            } => {
                // The one-shot preprocessor is awaited inline by the
                // pipeline and never observed here.
                tracing::warn!("unexpected exit event for the preprocessor; ignoring");
                CoreStep {
                    commands: Vec::new(),
                    keep_running: !self.state.is_idle(),
                }
            }
        }
    }
}
