use std::io::Write;

use buildgate::cli::CliArgs;
use buildgate::config::{load_and_validate, load_from_path, load_settings, merge_cli, RawConfigFile};
use buildgate::criteria::Classification;
use clap::Parser;
use tempfile::{tempdir, NamedTempFile};

use crate::common::RevisionBuilder;

fn args(argv: &[&str]) -> CliArgs {
    let mut full = vec!["buildgate"];
    full.extend_from_slice(argv);
    CliArgs::try_parse_from(full).unwrap()
}

#[test]
fn toml_file_fills_every_section() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[criteria]
exclude_user = ["jenkins"]
exclude_msg = ["^\\[skip ci\\]"]
include_dir = ["libs/core", "libs/net"]

[build]
timeout_secs = 120
record_file = "build-state.cfg"
descriptor = "GNUmakefile"
commit_watermark = true
"#
    )
    .unwrap();

    let settings = load_and_validate(file.path()).unwrap();

    assert_eq!(settings.criteria().include_dir, vec!["libs/core", "libs/net"]);
    assert_eq!(settings.criteria().exclude_user, vec!["jenkins"]);
    assert_eq!(settings.build().timeout_secs, 120);
    assert_eq!(settings.build().record_file, "build-state.cfg");
    assert_eq!(settings.build().descriptor, "GNUmakefile");
    assert!(settings.build().commit_watermark);
}

#[test]
fn build_section_has_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[criteria]\ninclude_dir = [\"libs/core\"]").unwrap();

    let settings = load_and_validate(file.path()).unwrap();

    assert_eq!(settings.build().timeout_secs, 60);
    assert_eq!(settings.build().record_file, "jenkins-build.cfg");
    assert_eq!(settings.build().descriptor, "Makefile");
    assert!(!settings.build().commit_watermark);
}

#[test]
fn cli_lists_replace_file_lists() {
    let mut raw = RawConfigFile::default();
    raw.criteria.include_dir = vec!["libs/old".to_string()];
    raw.criteria.exclude_user = vec!["jenkins".to_string()];

    let merged = merge_cli(raw, &args(&["-D", "libs/core, libs/net", "-b", "5", "-c", "state.cfg"]));

    assert_eq!(merged.criteria.include_dir, vec!["libs/core", "libs/net"]);
    assert_eq!(merged.criteria.exclude_user, vec!["jenkins"]);
    assert_eq!(merged.build.timeout_secs, 5);
    assert_eq!(merged.build.record_file, "state.cfg");
}

#[test]
fn settings_from_flags_alone() {
    let repo = tempdir().unwrap();
    let repo_arg = repo.path().to_string_lossy().into_owned();

    let settings = load_settings(&args(&[
        "--repo",
        &repo_arg,
        "--include-dir",
        "libs/core",
        "--exclude-user",
        "jenkins,release-bot",
    ]))
    .unwrap();

    assert_eq!(settings.criteria().exclude_user, vec!["jenkins", "release-bot"]);
    assert_eq!(settings.build().timeout_secs, 60);
}

#[test]
fn repository_config_file_is_picked_up() {
    let repo = tempdir().unwrap();
    std::fs::write(
        repo.path().join("Buildgate.toml"),
        "[criteria]\ninclude_dir = [\"apps\"]\n[build]\ntimeout_secs = 9\n",
    )
    .unwrap();
    let repo_arg = repo.path().to_string_lossy().into_owned();

    let settings = load_settings(&args(&["--repo", &repo_arg])).unwrap();

    assert_eq!(settings.criteria().include_dir, vec!["apps"]);
    assert_eq!(settings.build().timeout_secs, 9);
}

#[test]
fn load_from_path_only_deserializes() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[build]\ntimeout_secs = 0").unwrap();

    // Semantically invalid, but still a well-formed file.
    let raw = load_from_path(file.path()).unwrap();
    assert_eq!(raw.build.timeout_secs, 0);
    assert!(raw.criteria.include_dir.is_empty());
}

#[test]
fn validated_settings_carry_compiled_criteria() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[criteria]\nexclude_user = [\"jenkins\"]\ninclude_dir = [\"libs/core\", \"libs/net\"]"
    )
    .unwrap();

    let settings = load_and_validate(file.path()).unwrap();
    let criteria = settings.compiled_criteria();

    let bot = RevisionBuilder::new("a")
        .author("jenkins", "ci@example.com")
        .path("libs/core/x.c")
        .build();
    assert_eq!(criteria.classify(&bot), Classification::ExcludedByUser);

    let human = RevisionBuilder::new("b").path("libs/net/y.c").build();
    assert_eq!(criteria.classify(&human), Classification::Touches(vec!["libs/net"]));
}
