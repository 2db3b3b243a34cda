// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs the launcher's subprocesses with `tokio::process::Command`
//! and reports their exits back to the orchestration runtime as
//! `RuntimeEvent`s.
//!
//! - [`spec`] describes *what* to run (`ProcessSpec`).
//! - [`process_runner`] runs a process to completion, or spawns one and
//!   observes its exit in a background task.
//! - [`handle`] is the caller's grip on a spawned process (`ProcessHandle`),
//!   including fire-and-forget termination.
//! - [`backend`] provides the `ProcessBackend` trait and the concrete
//!   `RealProcessBackend`; tests substitute a fake implementation.

pub mod backend;
pub mod handle;
pub mod process_runner;
pub mod spec;

pub use backend::{ProcessBackend, RealProcessBackend};
pub use handle::ProcessHandle;
pub use spec::ProcessSpec;
