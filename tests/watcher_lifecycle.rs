// tests/watcher_lifecycle.rs

use std::error::Error;

use sitelaunch::config::ConfigFile;
use sitelaunch::engine::Pipeline;
use sitelaunch::errors::SitelaunchError;
use sitelaunch::fs::mock::MockFileSystem;
use sitelaunch::locate::ToolLocator;
use sitelaunch::types::{ExitOutcome, ProcessRole};
use sitelaunch_test_utils::builders::ConfigFileBuilder;
use sitelaunch_test_utils::fake_backend::{FakeBackend, SIGTERM};
use sitelaunch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn site_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("node_modules/@gridsome/cli/bin/gridsome.js", "#!/usr/bin/env node");
    fs.add_file("content/logo.png", "png");
    fs
}

fn site_config() -> ConfigFile {
    ConfigFileBuilder::new()
        .with_preprocessor("bin/preprocess")
        .with_copy_ext("png")
        .build()
}

fn local_locator(fs: &MockFileSystem) -> ToolLocator<'_> {
    ToolLocator::new(fs, "gridsome", "node_modules").with_search_path(None)
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Watcher dies with 7 while the dev server is healthy: the server is
/// terminated and the launcher exits with 7, whatever the server reports.
#[tokio::test]
async fn watcher_exit_terminates_server_and_sets_exit_code() -> TestResult {
    init_tracing();

    let fs = site_fs();
    let cfg = site_config();

    // The server "handles" SIGTERM and exits with its own code; that must
    // not leak into the launcher's status.
    let backend = FakeBackend::new().with_terminate_outcome(ExitOutcome::exited(143));
    let controller = backend.controller();

    let run = Pipeline::new(&cfg, &fs, backend)
        .with_locator(local_locator(&fs))
        .run(Some("develop"), &[]);

    let drive = async {
        controller.wait_for_spawn(ProcessRole::Server).await;
        controller.exit(ProcessRole::Watcher, ExitOutcome::exited(7));
    };

    let (summary, ()) = with_timeout(async { tokio::join!(run, drive) }).await;
    let summary = summary?;

    assert_eq!(summary.exit_code, 7);
    assert_eq!(controller.terminated(), vec![ProcessRole::Server]);
    assert!(summary.asset_copies.is_empty(), "develop mode never copies assets");
    Ok(())
}

#[tokio::test]
async fn watcher_killed_by_signal_still_brings_server_down() -> TestResult {
    init_tracing();

    let fs = site_fs();
    let cfg = site_config();
    let backend = FakeBackend::new();
    let controller = backend.controller();

    let run = Pipeline::new(&cfg, &fs, backend)
        .with_locator(local_locator(&fs))
        .run(Some("develop"), &[]);

    let drive = async {
        controller.wait_for_spawn(ProcessRole::Server).await;
        controller.exit(ProcessRole::Watcher, ExitOutcome::signalled(SIGTERM));
    };

    let (summary, ()) = with_timeout(async { tokio::join!(run, drive) }).await;

    assert_eq!(summary?.exit_code, 128 + SIGTERM);
    assert_eq!(controller.terminated(), vec![ProcessRole::Server]);
    Ok(())
}

#[tokio::test]
async fn clean_watcher_exit_still_terminates_server() -> TestResult {
    init_tracing();

    let fs = site_fs();
    let cfg = site_config();
    let backend = FakeBackend::new();
    let controller = backend.controller();

    let run = Pipeline::new(&cfg, &fs, backend)
        .with_locator(local_locator(&fs))
        .run(Some("develop"), &[]);

    let drive = async {
        controller.wait_for_spawn(ProcessRole::Server).await;
        controller.exit(ProcessRole::Watcher, ExitOutcome::exited(0));
    };

    let (summary, ()) = with_timeout(async { tokio::join!(run, drive) }).await;

    assert_eq!(summary?.exit_code, 0);
    assert_eq!(controller.terminated(), vec![ProcessRole::Server]);
    Ok(())
}

/// Server death never touches the watcher; the launcher keeps waiting for
/// the watcher, whose exit then decides the status.
#[tokio::test]
async fn server_exit_does_not_terminate_watcher() -> TestResult {
    init_tracing();

    let fs = site_fs();
    let cfg = site_config();
    let backend = FakeBackend::new();
    let controller = backend.controller();

    let run = Pipeline::new(&cfg, &fs, backend)
        .with_locator(local_locator(&fs))
        .run(Some("develop"), &[]);

    let drive = async {
        controller.wait_for_spawn(ProcessRole::Server).await;
        controller.exit(ProcessRole::Server, ExitOutcome::exited(4));
        tokio::task::yield_now().await;
        assert!(
            controller.terminated().is_empty(),
            "the watcher must survive the server"
        );
        controller.exit(ProcessRole::Watcher, ExitOutcome::exited(5));
    };

    let (summary, ()) = with_timeout(async { tokio::join!(run, drive) }).await;

    assert_eq!(summary?.exit_code, 5);
    assert!(controller.terminated().is_empty());
    Ok(())
}

#[tokio::test]
async fn develop_mode_forwards_passthrough_only_to_preprocessor_runs() -> TestResult {
    init_tracing();

    let fs = site_fs();
    let cfg = site_config();
    let backend = FakeBackend::new();
    let controller = backend.controller();
    let passthrough = strings(&["--verbose", "docs/intro.md"]);

    let run = Pipeline::new(&cfg, &fs, backend)
        .with_locator(local_locator(&fs))
        .run(Some("develop"), &passthrough);

    let drive = async {
        controller.wait_for_spawn(ProcessRole::Server).await;
        controller.exit(ProcessRole::Watcher, ExitOutcome::exited(0));
    };

    let (summary, ()) = with_timeout(async { tokio::join!(run, drive) }).await;
    summary?;

    let pre = controller.invocations_of(ProcessRole::Preprocessor);
    assert_eq!(pre.len(), 1);
    assert_eq!(pre[0].spec.args, strings(&["preprocess", "--verbose", "docs/intro.md"]));

    let watcher = controller.invocations_of(ProcessRole::Watcher);
    assert_eq!(watcher.len(), 1);
    assert_eq!(watcher[0].spec.args, strings(&["watch", "--verbose", "docs/intro.md"]));
    assert_eq!(watcher[0].spec.program, pre[0].spec.program);

    let server = controller.invocations_of(ProcessRole::Server);
    assert_eq!(server.len(), 1);
    assert_eq!(server[0].spec.args, strings(&["develop"]));

    // Order: preprocess, then watcher, then server.
    let roles: Vec<ProcessRole> = controller.invocations().iter().map(|i| i.role).collect();
    assert_eq!(
        roles,
        vec![ProcessRole::Preprocessor, ProcessRole::Watcher, ProcessRole::Server]
    );
    Ok(())
}

#[tokio::test]
async fn server_spawn_failure_stops_the_running_watcher() -> TestResult {
    init_tracing();

    let fs = site_fs();
    let cfg = site_config();
    let backend = FakeBackend::new().with_spawn_failure(ProcessRole::Server);
    let controller = backend.controller();

    let result = with_timeout(
        Pipeline::new(&cfg, &fs, backend)
            .with_locator(local_locator(&fs))
            .run(Some("develop"), &[]),
    )
    .await;

    assert!(matches!(result, Err(SitelaunchError::Spawn { .. })));
    assert_eq!(controller.terminated(), vec![ProcessRole::Watcher]);
    Ok(())
}
