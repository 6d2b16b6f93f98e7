use std::path::{Path, PathBuf};

use buildgate::fs::mock::MockFileSystem;
use buildgate::fs::{FileSystem, RealFileSystem};
use tempfile::tempdir;

#[test]
fn mock_write_creates_parent_entries() {
    let fs = MockFileSystem::new();
    fs.write(Path::new("./libs/core/jenkins-build.cfg"), b"x").unwrap();

    assert!(fs.is_file(Path::new("./libs/core/jenkins-build.cfg")));
    assert!(fs.is_dir(Path::new("./libs/core")));
    assert!(fs.is_dir(Path::new("./libs")));
}

#[test]
fn mock_rename_replaces_target() {
    let fs = MockFileSystem::new();
    fs.add_file("a/old", "old");
    fs.add_file("a/.tmp", "new");

    fs.rename(Path::new("a/.tmp"), Path::new("a/old")).unwrap();

    assert_eq!(fs.contents("a/old").as_deref(), Some("new"));
    assert!(!fs.exists(Path::new("a/.tmp")));
    assert_eq!(fs.file_paths(), vec![PathBuf::from("a/old")]);
}

#[test]
fn mock_read_only_rejects_writes_but_allows_reads() {
    let fs = MockFileSystem::new();
    fs.add_file("a/record", "keep");
    fs.set_read_only(true);

    assert!(fs.write(Path::new("a/record"), b"lost").is_err());
    assert!(fs.rename(Path::new("a/record"), Path::new("a/other")).is_err());
    assert_eq!(fs.read_to_string(Path::new("a/record")).unwrap(), "keep");
}

#[test]
fn mock_remove_file_rejects_directories() {
    let fs = MockFileSystem::new();
    fs.add_dir("a/b");

    assert!(fs.remove_file(Path::new("a/b")).is_err());
    assert!(fs.remove_file(Path::new("a/missing")).is_err());
}

#[test]
fn real_fs_write_creates_directories() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("libs/core/jenkins-build.cfg");

    RealFileSystem.write(&target, b"[DEFAULT]\n").unwrap();

    assert!(RealFileSystem.is_file(&target));
    assert_eq!(RealFileSystem.read_to_string(&target).unwrap(), "[DEFAULT]\n");
}
