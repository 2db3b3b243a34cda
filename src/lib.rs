// src/lib.rs

pub mod assets;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod locate;
pub mod logging;
pub mod types;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_or_default};
use crate::engine::{Pipeline, PipelinePlan};
use crate::errors::Result;
use crate::exec::RealProcessBackend;
use crate::fs::RealFileSystem;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (once, then passed down by reference)
/// - the real filesystem and process backend
/// - the pipeline (or, with `--dry-run`, just its plan)
///
/// Returns the status the process should exit with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_or_default(args.config.as_deref())?;
    debug!(?cfg, "configuration loaded");

    let fs = RealFileSystem;
    let pipeline = Pipeline::new(&cfg, &fs, RealProcessBackend);

    if args.dry_run {
        let plan = pipeline.plan(args.mode.as_deref(), &args.passthrough)?;
        print_dry_run(&cfg, &plan);
        return Ok(0);
    }

    let summary = pipeline
        .run(args.mode.as_deref(), &args.passthrough)
        .await?;
    Ok(summary.exit_code)
}

/// Simple dry-run output: print resolved config and the commands.
fn print_dry_run(cfg: &ConfigFile, plan: &PipelinePlan) {
    println!("sitelaunch dry-run ({})", plan.mode);
    println!("  project root: {}", cfg.project_root().display());
    println!();

    println!("commands:");
    println!("  $ {}", plan.preprocess.command_line());
    if let Some(watch) = &plan.watch {
        println!("  $ {} &", watch.command_line());
    }
    println!("  $ {}", plan.server.command_line());

    if plan.mode.copies_assets() {
        let build = cfg.build();
        println!();
        println!(
            "after a clean build, copy {:?} from {} to {} (no overwrite)",
            cfg.copy_file_exts(),
            build.content_dir.display(),
            build.dist_dir.display()
        );
    }

    debug!("dry-run complete (no execution)");
}
