use std::io::Write;

use buildgate::cli::CliArgs;
use buildgate::config::{load_and_validate, load_settings, validate_config};
use buildgate::errors::BuildgateError;
use clap::Parser;
use tempfile::NamedTempFile;

use crate::common::SettingsBuilder;

#[test]
fn missing_config_file_is_io_error() {
    let result = load_and_validate("does_not_exist.toml");

    match result {
        Err(BuildgateError::IoError(_)) => {} // Expected
        Err(e) => panic!("Expected IoError, got {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn invalid_toml_is_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[criteria\ninclude_dir = ").unwrap();

    match load_and_validate(file.path()) {
        Err(BuildgateError::TomlError(_)) => {} // Expected
        Err(e) => panic!("Expected TomlError, got {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn no_include_dirs_is_config_error() {
    let raw = SettingsBuilder::new().exclude_user("jenkins").raw();

    match validate_config(&raw) {
        Err(BuildgateError::ConfigError(msg)) => assert!(msg.contains("include")),
        Err(e) => panic!("Expected ConfigError, got {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn bad_user_regex_fails_before_any_work() {
    let raw = SettingsBuilder::new()
        .include_dir("libs/core")
        .exclude_user("jenk[ins")
        .raw();

    match validate_config(&raw) {
        Err(BuildgateError::InvalidPattern { kind, pattern, .. }) => {
            assert_eq!(kind, "user");
            assert_eq!(pattern, "jenk[ins");
        }
        Err(e) => panic!("Expected InvalidPattern, got {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn blank_message_pattern_is_rejected() {
    let raw = SettingsBuilder::new()
        .include_dir("libs/core")
        .exclude_msg("  ")
        .raw();

    assert!(matches!(validate_config(&raw), Err(BuildgateError::ConfigError(_))));
}

#[test]
fn zero_timeout_is_rejected() {
    let raw = SettingsBuilder::new().include_dir("libs/core").timeout_secs(0).raw();

    match validate_config(&raw) {
        Err(BuildgateError::ConfigError(msg)) => assert!(msg.contains("timeout_secs")),
        Err(e) => panic!("Expected ConfigError, got {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn record_file_must_be_a_plain_name() {
    for bad in ["../escape.cfg", "nested/state.cfg", ""] {
        let raw = SettingsBuilder::new()
            .include_dir("libs/core")
            .record_file(bad)
            .raw();
        assert!(
            matches!(validate_config(&raw), Err(BuildgateError::ConfigError(_))),
            "record file {bad:?} should be rejected"
        );
    }
}

#[test]
fn explicit_missing_config_is_an_error() {
    let args = CliArgs::try_parse_from([
        "buildgate",
        "--config",
        "/nonexistent/buildgate/Buildgate.toml",
        "-D",
        "libs/core",
    ])
    .unwrap();

    assert!(matches!(load_settings(&args), Err(BuildgateError::IoError(_))));
}
