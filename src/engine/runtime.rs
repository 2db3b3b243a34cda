// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::assets::{AssetCopier, CopyReport};
use crate::errors::Result;
use crate::exec::ProcessHandle;

use super::core::CoreRuntime;
use super::{CoreCommand, RuntimeEvent};

/// What happened once every long-running process has ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Final value of the exit-code register.
    pub exit_code: i32,
    /// One entry per completed asset copy pass.
    pub asset_copies: Vec<CopyReport>,
}

impl RunSummary {
    pub fn exited(exit_code: i32) -> Self {
        Self {
            exit_code,
            asset_copies: Vec::new(),
        }
    }
}

/// Feeds process exits into `CoreRuntime` and carries out its commands.
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// lifetime-coupling semantics. It owns the process handles so it can
/// terminate the generator, and the asset copier for build mode.
pub struct Runtime<'a> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    server: ProcessHandle,
    /// Held so the watcher stays owned by the launcher for its whole life.
    watcher: Option<ProcessHandle>,
    copier: AssetCopier<'a>,
    summary: RunSummary,
}

impl fmt::Debug for Runtime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("server", &self.server)
            .field("watcher", &self.watcher)
            .finish_non_exhaustive()
    }
}

impl<'a> Runtime<'a> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        server: ProcessHandle,
        watcher: Option<ProcessHandle>,
        copier: AssetCopier<'a>,
    ) -> Self {
        Self {
            core,
            event_rx,
            server,
            watcher,
            copier,
            summary: RunSummary::default(),
        }
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core runtime.
    /// - Executes commands returned by the core (terminate, copy).
    /// - Returns once the core reports that nothing is left running.
    pub async fn run(mut self) -> Result<RunSummary> {
        debug!("runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    warn!("process event channel closed before all processes reported; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command);
            }

            if !step.keep_running {
                debug!("all processes have exited; stopping runtime");
                break;
            }
        }

        self.summary.exit_code = self.core.exit_code();
        info!(exit_code = self.summary.exit_code, "sitelaunch finished");
        Ok(self.summary)
    }

    /// Execute a single command from the core.
    fn execute_command(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::TerminateServer => {
                // Fire-and-forget: the exit arrives later as a normal event.
                self.server.terminate();
            }
            CoreCommand::CopyAssets => match self.copier.copy() {
                Ok(report) => self.summary.asset_copies.push(report),
                Err(e) => warn!(error = %format!("{e:#}"), "static content copy failed"),
            },
        }
    }
}
