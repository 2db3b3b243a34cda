// tests/tool_locator.rs

use std::error::Error;
use std::ffi::OsString;
use std::path::PathBuf;

use sitelaunch::fs::mock::MockFileSystem;
use sitelaunch::fs::RealFileSystem;
use sitelaunch::locate::{ToolLocation, ToolLocator};
use sitelaunch_test_utils::builders::ConfigFileBuilder;
use sitelaunch_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn candidates_are_plain_package_first_then_scoped() {
    let fs = MockFileSystem::new();
    let locator = ToolLocator::new(&fs, "gridsome", "node_modules").with_search_path(None);

    assert_eq!(
        locator.local_candidates(),
        vec![
            PathBuf::from("node_modules/gridsome/bin/gridsome.js"),
            PathBuf::from("node_modules/gridsome/cli/bin/gridsome.js"),
            PathBuf::from("node_modules/@gridsome/bin/gridsome.js"),
            PathBuf::from("node_modules/@gridsome/cli/bin/gridsome.js"),
        ]
    );
}

#[test]
fn first_existing_candidate_wins() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("node_modules/@gridsome/cli/bin/gridsome.js", "scoped");
    fs.add_file("node_modules/gridsome/cli/bin/gridsome.js", "plain");

    let locator = ToolLocator::new(&fs, "gridsome", "node_modules").with_search_path(None);
    assert_eq!(
        locator.locate(),
        Some(ToolLocation::Script(PathBuf::from(
            "node_modules/gridsome/cli/bin/gridsome.js"
        )))
    );
}

#[test]
fn scoped_package_is_used_when_plain_one_is_absent() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("node_modules/@gridsome/cli/bin/gridsome.js", "scoped");

    let locator = ToolLocator::new(&fs, "gridsome", "node_modules").with_search_path(None);
    assert_eq!(
        locator.locate(),
        Some(ToolLocation::Script(PathBuf::from(
            "node_modules/@gridsome/cli/bin/gridsome.js"
        )))
    );
}

#[test]
fn directories_named_like_entry_scripts_do_not_count() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_dir("node_modules/gridsome/bin/gridsome.js");

    let locator = ToolLocator::new(&fs, "gridsome", "node_modules").with_search_path(None);
    assert_eq!(locator.locate(), None);
}

#[test]
fn missing_modules_dir_means_not_found() {
    init_tracing();

    let fs = MockFileSystem::new();
    let locator = ToolLocator::new(&fs, "gridsome", "node_modules").with_search_path(None);
    assert_eq!(locator.locate(), None);
}

#[test]
fn empty_search_path_falls_back_to_modules_dir() -> TestResult {
    init_tracing();

    let empty_bin = tempfile::tempdir()?;
    let fs = MockFileSystem::new();
    fs.add_file("node_modules/gridsome/bin/gridsome.js", "plain");

    let locator = ToolLocator::new(&fs, "gridsome", "node_modules")
        .with_search_path(Some(OsString::from(empty_bin.path())));
    assert_eq!(
        locator.locate(),
        Some(ToolLocation::Script(PathBuf::from(
            "node_modules/gridsome/bin/gridsome.js"
        )))
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn command_on_search_path_takes_priority() -> TestResult {
    use std::os::unix::fs::PermissionsExt;

    init_tracing();

    let bin = tempfile::tempdir()?;
    let exe = bin.path().join("gridsome");
    std::fs::write(&exe, "#!/bin/sh\nexit 0\n")?;
    std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755))?;

    let fs = MockFileSystem::new();
    fs.add_file("node_modules/gridsome/bin/gridsome.js", "plain");

    let locator = ToolLocator::new(&fs, "gridsome", "node_modules")
        .with_search_path(Some(OsString::from(bin.path())));
    let found = locator.locate();

    assert_eq!(found, Some(ToolLocation::Command("gridsome".to_string())));
    assert_eq!(
        found.as_ref().map(|f| f.program().to_os_string()),
        Some(OsString::from("gridsome"))
    );
    Ok(())
}

#[test]
fn locator_from_config_resolves_against_project_root() -> TestResult {
    init_tracing();

    let root = tempfile::tempdir()?;
    let script = root.path().join("deps/@sitegen/cli/bin/sitegen.js");
    std::fs::create_dir_all(script.parent().ok_or("no parent")?)?;
    std::fs::write(&script, "// entry")?;

    let cfg = ConfigFileBuilder::new()
        .with_generator("sitegen")
        .with_modules_dir("deps")
        .with_project_root(root.path())
        .build();

    let fs = RealFileSystem;
    let locator = ToolLocator::from_config(&fs, &cfg).with_search_path(None);

    assert_eq!(locator.tool_name(), "sitegen");
    assert_eq!(locator.locate(), Some(ToolLocation::Script(script)));
    Ok(())
}
