use std::path::Path;
use std::process::Command;

use buildgate::engine::decide_range;
use buildgate::errors::BuildgateError;
use buildgate::revision::{parse_show_output, revisions, GitCli, RevisionProvider, RevisionRange};
use buildgate::watermark::MemoryWatermarkStore;
use tempfile::tempdir;

use crate::common::{init_tracing, SettingsBuilder};

#[test]
fn parses_show_output_with_multiline_message() {
    let text = "Alice Doe\0alice@example.com\01700000000\0fix parser\n\nlonger body\n\0\nlibs/core/x.c\nlibs/core/y.c\n";

    let rev = parse_show_output("abc123", text).unwrap();

    assert_eq!(rev.id, "abc123");
    assert_eq!(rev.author_name, "Alice Doe");
    assert_eq!(rev.author_email, "alice@example.com");
    assert_eq!(rev.commit_timestamp, 1700000000);
    assert_eq!(rev.message, "fix parser\n\nlonger body");
    assert_eq!(rev.changed_paths, vec!["libs/core/x.c", "libs/core/y.c"]);
}

#[test]
fn parses_merge_without_files() {
    let text = "Bob\0bob@example.com\042\0Merge branch 'x'\n\0\n";

    let rev = parse_show_output("m1", text).unwrap();

    assert!(rev.changed_paths.is_empty());
    assert_eq!(rev.commit_timestamp, 42);
}

#[test]
fn truncated_show_output_is_metadata_error() {
    match parse_show_output("abc", "Alice\0alice@example.com") {
        Err(BuildgateError::Metadata(msg)) => assert!(msg.contains("abc")),
        Err(e) => panic!("Expected Metadata error, got {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn bad_timestamp_is_metadata_error() {
    let text = "Alice\0alice@example.com\0yesterday\0msg\0\n";
    assert!(matches!(
        parse_show_output("abc", text),
        Err(BuildgateError::Metadata(_))
    ));
}

fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(repo: &Path, args: &[&str], author: &str, when: i64) {
    let date = format!("@{when} +0000");
    let status = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .env("GIT_AUTHOR_NAME", author)
        .env("GIT_AUTHOR_EMAIL", format!("{author}@example.com"))
        .env("GIT_COMMITTER_NAME", author)
        .env("GIT_COMMITTER_EMAIL", format!("{author}@example.com"))
        .env("GIT_AUTHOR_DATE", &date)
        .env("GIT_COMMITTER_DATE", &date)
        .output()
        .unwrap();
    assert!(status.status.success(), "git {:?} failed: {:?}", args, status);
}

fn commit(repo: &Path, file: &str, author: &str, message: &str, when: i64) {
    let path = repo.join(file);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, format!("{when}\n")).unwrap();
    git(repo, &["add", file], author, when);
    git(repo, &["commit", "-q", "-m", message], author, when);
}

fn rev_parse(repo: &Path, rev: &str) -> String {
    let out = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["rev-parse", rev])
        .output()
        .unwrap();
    String::from_utf8(out.stdout).unwrap().trim().to_string()
}

#[test]
fn reads_history_from_a_real_repository() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    init_tracing();

    let dir = tempdir().unwrap();
    let repo = dir.path();
    git(repo, &["init", "-q"], "setup", 1);
    commit(repo, "libs/core/a.c", "alice", "first", 100);
    commit(repo, "libs/net/b.c", "jenkins", "generated", 200);
    commit(repo, "libs/core/c.c", "bob", "second\n\nbody", 300);

    let provider = GitCli::new(repo);
    let all: Vec<_> = revisions(&provider, &RevisionRange::all_history())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(all.len(), 3);
    assert_eq!(all[0].author_name, "bob");
    assert_eq!(all[0].commit_timestamp, 300);
    assert_eq!(all[0].message, "second\n\nbody");
    assert_eq!(all[0].changed_paths, vec!["libs/core/c.c"]);

    let first = rev_parse(repo, "HEAD~2");
    let newer: Vec<String> = provider
        .revision_ids(&RevisionRange::since(first))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(newer.len(), 2);

    let criteria = SettingsBuilder::new()
        .include_dir("libs/core")
        .include_dir("libs/net")
        .exclude_user("jenkins")
        .criteria();
    let decision = decide_range(
        &criteria,
        &provider,
        &RevisionRange::all_history(),
        &MemoryWatermarkStore::new(),
    )
    .unwrap();

    assert_eq!(decision.directories, vec!["libs/core"]);
    assert_eq!(decision.newest_qualifying_timestamp, 300);
}

#[test]
fn unknown_baseline_surfaces_as_error() {
    if !git_available() {
        return;
    }
    let dir = tempdir().unwrap();
    let repo = dir.path();
    git(repo, &["init", "-q"], "setup", 1);
    commit(repo, "a.txt", "alice", "first", 100);

    let provider = GitCli::new(repo);
    let result: Result<Vec<_>, _> = revisions(&provider, &RevisionRange::since("deadbeef"))
        .and_then(|stream| stream.collect());

    assert!(matches!(result, Err(BuildgateError::Metadata(_))));
}

#[test]
fn repository_without_commits_is_an_empty_history() {
    if !git_available() {
        return;
    }
    init_tracing();
    let dir = tempdir().unwrap();
    let repo = dir.path();
    git(repo, &["init", "-q"], "setup", 1);

    let provider = GitCli::new(repo);
    let all: Vec<_> = revisions(&provider, &RevisionRange::all_history())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert!(all.is_empty());

    let criteria = SettingsBuilder::new().include_dir("libs/core").criteria();
    let decision = decide_range(
        &criteria,
        &provider,
        &RevisionRange::all_history(),
        &MemoryWatermarkStore::new(),
    )
    .unwrap();

    assert!(!decision.must_run);
    assert_eq!(decision.revisions_examined, 0);
}

#[test]
fn directory_outside_any_repository_is_still_an_error() {
    if !git_available() {
        return;
    }
    let dir = tempdir().unwrap();

    let provider = GitCli::new(dir.path());
    let result: Result<Vec<_>, _> = revisions(&provider, &RevisionRange::all_history())
        .and_then(|stream| stream.collect());

    assert!(matches!(result, Err(BuildgateError::Metadata(_))));
}
