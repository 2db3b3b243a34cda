// src/engine/mod.rs

//! Orchestration engine for sitelaunch.
//!
//! This module ties together:
//! - the pipeline sequencing (mode check, preprocessing, tool lookup,
//!   starting the watcher and the generator) in [`pipeline`]
//! - the lifetime coupling between watcher and generator, and the exit-code
//!   register, as a pure state machine in [`core`]
//! - the async IO shell that feeds process exits into the core and carries
//!   out its commands in [`runtime`]

use crate::types::{ExitOutcome, ProcessRole};

/// Events flowing into the runtime from process observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// A spawned process ended (normally or by signal).
    ProcessExited {
        role: ProcessRole,
        /// Rendered command line, for reports.
        command: String,
        outcome: ExitOutcome,
    },
}

pub mod core;
pub mod event_handlers;
pub mod pipeline;
pub mod runtime;

pub use core::{CoreRuntime, Phase};
pub use event_handlers::{CoreCommand, CoreStep};
pub use pipeline::{Pipeline, PipelinePlan};
pub use runtime::{RunSummary, Runtime};
