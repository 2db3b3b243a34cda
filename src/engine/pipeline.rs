// src/engine/pipeline.rs

//! Sequencing of the launcher's subprocesses.
//!
//! ```text
//! validate mode -> preprocess (blocking) -> locate generator
//!   -> [develop] start watcher -> start generator -> runtime loop
//! ```
//!
//! A failed preprocess ends the pipeline with the preprocessor's status;
//! nothing after it is started.

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::assets::AssetCopier;
use crate::config::ConfigFile;
use crate::engine::core::CoreRuntime;
use crate::engine::event_handlers::report_exit;
use crate::engine::runtime::{RunSummary, Runtime};
use crate::engine::RuntimeEvent;
use crate::errors::{Result, SitelaunchError};
use crate::exec::{ProcessBackend, ProcessHandle, ProcessSpec};
use crate::fs::FileSystem;
use crate::locate::{ToolLocation, ToolLocator};
use crate::types::{InvocationMode, ProcessRole};

/// Subcommand for the one-shot preprocessing run.
pub const PREPROCESS_SUBCOMMAND: &str = "preprocess";
/// Subcommand for the long-running content watcher.
pub const WATCH_SUBCOMMAND: &str = "watch";

/// Capacity of the process-exit channel; at most two processes report.
const EVENT_CHANNEL_CAPACITY: usize = 8;

/// Every command the pipeline would run for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePlan {
    pub mode: InvocationMode,
    pub preprocess: ProcessSpec,
    pub watch: Option<ProcessSpec>,
    pub server: ProcessSpec,
}

/// Validate the raw mode token.
///
/// A missing token is reported the same way as an unknown one.
pub fn parse_mode(token: Option<&str>) -> Result<InvocationMode> {
    match token {
        Some(token) => token.parse(),
        None => Err(SitelaunchError::InvalidMode("(none)".to_string())),
    }
}

/// Drives one launcher invocation.
pub struct Pipeline<'a, B: ProcessBackend> {
    config: &'a ConfigFile,
    fs: &'a dyn FileSystem,
    backend: B,
    locator: ToolLocator<'a>,
}

impl<B: ProcessBackend> fmt::Debug for Pipeline<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

impl<'a, B: ProcessBackend> Pipeline<'a, B> {
    pub fn new(config: &'a ConfigFile, fs: &'a dyn FileSystem, backend: B) -> Self {
        Self {
            config,
            fs,
            backend,
            locator: ToolLocator::from_config(fs, config),
        }
    }

    /// Replace the default (environment-driven) generator lookup.
    pub fn with_locator(mut self, locator: ToolLocator<'a>) -> Self {
        self.locator = locator;
        self
    }

    /// `<preprocessor> <subcommand> ...passthrough`
    pub fn preprocessor_spec(&self, subcommand: &str, passthrough: &[String]) -> ProcessSpec {
        let mut args = Vec::with_capacity(passthrough.len() + 1);
        args.push(subcommand.to_string());
        args.extend(passthrough.iter().cloned());
        ProcessSpec::new(self.config.preprocessor_path(), args)
    }

    /// `<generator> <mode>`; passthrough arguments are not forwarded.
    pub fn server_spec(&self, tool: &ToolLocation, mode: InvocationMode) -> ProcessSpec {
        ProcessSpec::new(tool.program(), vec![mode.as_str().to_string()])
    }

    fn locate_tool(&self) -> Result<ToolLocation> {
        self.locator
            .locate()
            .ok_or_else(|| SitelaunchError::ToolNotFound(self.locator.tool_name().to_string()))
    }

    /// Resolve everything that would run, without running it.
    pub fn plan(&self, mode: Option<&str>, passthrough: &[String]) -> Result<PipelinePlan> {
        let mode = parse_mode(mode)?;
        let tool = self.locate_tool()?;

        Ok(PipelinePlan {
            mode,
            preprocess: self.preprocessor_spec(PREPROCESS_SUBCOMMAND, passthrough),
            watch: mode
                .starts_watcher()
                .then(|| self.preprocessor_spec(WATCH_SUBCOMMAND, passthrough)),
            server: self.server_spec(&tool, mode),
        })
    }

    /// Run the whole pipeline and return the launcher's exit status.
    pub async fn run(mut self, mode: Option<&str>, passthrough: &[String]) -> Result<RunSummary> {
        let mode = parse_mode(mode)?;
        debug!(%mode, ?passthrough, "pipeline starting");

        // Preprocess content; nothing else starts unless this succeeds.
        let preprocess = self.preprocessor_spec(PREPROCESS_SUBCOMMAND, passthrough);
        let preprocess_cmd = preprocess.command_line();
        info!("$ {preprocess_cmd}");
        let outcome = self
            .backend
            .run_to_completion(ProcessRole::Preprocessor, preprocess)
            .await?;
        if !outcome.is_clean() {
            report_exit(ProcessRole::Preprocessor, &preprocess_cmd, outcome);
            return Ok(RunSummary::exited(outcome.exit_code()));
        }

        let tool = self.locate_tool()?;

        let (rt_tx, mut rt_rx) = mpsc::channel::<RuntimeEvent>(EVENT_CHANNEL_CAPACITY);

        let watcher = if mode.starts_watcher() {
            let watch = self.preprocessor_spec(WATCH_SUBCOMMAND, passthrough);
            info!("$ {} &", watch.command_line());
            Some(
                self.backend
                    .spawn(ProcessRole::Watcher, watch, rt_tx.clone())?,
            )
        } else {
            None
        };

        let server_spec = self.server_spec(&tool, mode);
        info!("$ {}", server_spec.command_line());
        let server = match self
            .backend
            .spawn(ProcessRole::Server, server_spec, rt_tx.clone())
        {
            Ok(handle) => handle,
            Err(e) => {
                if let Some(watcher) = watcher {
                    stop_watcher(watcher, &mut rt_rx).await;
                }
                return Err(e);
            }
        };

        // Only the process observers hold senders from here on.
        drop(rt_tx);

        let core = CoreRuntime::new(mode, watcher.is_some());
        let copier = AssetCopier::from_config(self.fs, self.config);
        Runtime::new(core, rt_rx, server, watcher, copier).run().await
    }
}

/// Bring down a watcher that has no generator to pair with, and wait for it.
async fn stop_watcher(mut watcher: ProcessHandle, rt_rx: &mut mpsc::Receiver<RuntimeEvent>) {
    watcher.terminate();
    while let Some(event) = rt_rx.recv().await {
        if let RuntimeEvent::ProcessExited {
            role: ProcessRole::Watcher,
            ..
        } = event
        {
            break;
        }
    }
}
