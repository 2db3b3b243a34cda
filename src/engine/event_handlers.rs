// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::{error, info};

use crate::engine::core::CoreState;
use crate::types::{ExitOutcome, ProcessRole};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreCommand {
    /// Ask the generator to stop (fire-and-forget).
    TerminateServer,
    /// Run the post-build asset copy.
    CopyAssets,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

/// Print the user-facing report for a process that ended badly.
///
/// A nonzero code and a signal death are reported differently: a signal is
/// not a code. Clean exits produce no report.
pub fn report_exit(role: ProcessRole, command: &str, outcome: ExitOutcome) {
    if let Some(code) = outcome.code.filter(|c| *c != 0) {
        error!(%role, exit_code = code, "{command} exited with code {code}");
    }
    if let Some(signal) = outcome.signal_name() {
        error!(%role, %signal, "{command} exited due to signal {signal}");
    }
}

/// Handle the generator's exit.
///
/// - Build mode + clean exit: copy static assets before anything else.
/// - The exit-code register takes the generator's code, unless the watcher
///   already forced the generator down (the watcher's code then stands).
/// - The watcher is never affected.
/// - A generator killed from outside has no code; `128 + signal` is recorded.
pub fn handle_server_exit(state: &mut CoreState, command: &str, outcome: ExitOutcome) -> CoreStep {
    let mut commands = Vec::new();

    if !state.server_alive {
        // Each process reports once; a second report is a backend bug.
        tracing::warn!("duplicate exit event for the generator; ignoring");
        return CoreStep {
            commands,
            keep_running: !state.is_idle(),
        };
    }
    state.server_alive = false;

    if state.mode.copies_assets() && outcome.is_clean() {
        commands.push(CoreCommand::CopyAssets);
    }

    if state.server_terminated_by_watcher {
        info!(
            exit_code = ?outcome.code,
            signal = ?outcome.signal_name(),
            "generator stopped after watcher exit"
        );
    } else {
        report_exit(ProcessRole::Server, command, outcome);
        state.exit_code = outcome.exit_code();
    }

    CoreStep {
        commands,
        keep_running: !state.is_idle(),
    }
}

/// Handle the watcher's exit, for whatever reason.
///
/// The generator is terminated unconditionally (if still running) and the
/// exit-code register takes the watcher's code.
pub fn handle_watcher_exit(state: &mut CoreState, command: &str, outcome: ExitOutcome) -> CoreStep {
    let mut commands = Vec::new();

    if !state.watcher_alive {
        tracing::warn!("exit event for a watcher that is not running; ignoring");
        return CoreStep {
            commands,
            keep_running: !state.is_idle(),
        };
    }
    state.watcher_alive = false;

    report_exit(ProcessRole::Watcher, command, outcome);

    if state.server_alive {
        state.server_terminated_by_watcher = true;
        commands.push(CoreCommand::TerminateServer);
    }
    state.exit_code = outcome.exit_code();

    CoreStep {
        commands,
        keep_running: !state.is_idle(),
    }
}
