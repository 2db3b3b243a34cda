// tests/fs_abstraction.rs

use std::path::{Path, PathBuf};

use sitelaunch::fs::FileSystem;
use sitelaunch::fs::mock::MockFileSystem;

#[test]
fn mock_fs_tracks_files_and_implicit_dirs() {
    let fs = MockFileSystem::new();
    fs.add_file("content/posts/cover.png", b"png");

    assert!(fs.is_file(Path::new("content/posts/cover.png")));
    assert!(fs.is_dir(Path::new("content/posts")));
    assert!(fs.is_dir(Path::new("content")));
    assert!(!fs.is_file(Path::new("content")));
    assert_eq!(fs.read(Path::new("content/posts/cover.png")).unwrap(), b"png");
    assert!(fs.read(Path::new("content")).is_err());
    assert!(fs.read(Path::new("missing.txt")).is_err());
}

#[test]
fn mock_fs_read_dir_uses_stored_spelling() {
    let fs = MockFileSystem::new();
    fs.add_file("content/a.png", b"a");
    fs.add_file("content/b.svg", b"b");
    fs.add_dir("dist");

    let mut top = fs.read_dir(Path::new(".")).unwrap();
    top.sort();
    assert_eq!(top, vec![PathBuf::from("content"), PathBuf::from("dist")]);

    let mut content = fs.read_dir(Path::new("content")).unwrap();
    content.sort();
    assert_eq!(
        content,
        vec![PathBuf::from("content/a.png"), PathBuf::from("content/b.svg")]
    );
    assert!(fs.read_dir(Path::new("content/a.png")).is_err());
}

#[test]
fn write_new_never_overwrites() {
    let fs = MockFileSystem::new();
    fs.add_file("dist/logo.png", b"old");

    assert!(!fs.write_new(Path::new("dist/logo.png"), b"new").unwrap());
    assert_eq!(fs.contents("dist/logo.png").unwrap(), b"old");

    assert!(fs.write_new(Path::new("dist/img/new.png"), b"new").unwrap());
    assert!(fs.is_dir(Path::new("dist/img")));
    assert_eq!(fs.contents("dist/img/new.png").unwrap(), b"new");
}

#[test]
fn real_fs_write_new_creates_parents_and_refuses_existing() {
    let dir = tempfile::tempdir().unwrap();
    let fs = sitelaunch::fs::RealFileSystem;
    let target = dir.path().join("dist/nested/file.txt");

    assert!(fs.write_new(&target, b"first").unwrap());
    assert!(!fs.write_new(&target, b"second").unwrap());
    assert_eq!(std::fs::read(&target).unwrap(), b"first");
    assert!(fs.is_dir(&dir.path().join("dist/nested")));
}
