// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, Settings};
use crate::errors::Result;

/// File name looked up in the repository when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "Buildgate.toml";

/// Load a configuration file from a given path and return the raw model.
///
/// This only performs TOML deserialization; semantic checks live in
/// `validate.rs`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it on its own.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Settings> {
    let raw_config = load_from_path(&path)?;
    let settings = Settings::try_from(raw_config)?;
    Ok(settings)
}

/// Build the effective settings for a run.
///
/// - An explicit `--config` must exist and parse.
/// - Otherwise `<repo>/Buildgate.toml` is read only if it exists.
/// - Command-line values are laid over the file values, then the result is
///   validated as a whole.
pub fn load_settings(args: &CliArgs) -> Result<Settings> {
    let raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => {
            let path = default_config_path(&args.repo);
            if path.is_file() {
                debug!(path = ?path, "using config file found in repository");
                load_from_path(&path)?
            } else {
                RawConfigFile::default()
            }
        }
    };

    let merged = merge_cli(raw, args);
    Settings::try_from(merged)
}

/// Lay command-line flags over file values.
///
/// Lists given on the command line replace the file's lists rather than
/// extending them, so a CI job can always fully override a checked-in file.
pub fn merge_cli(mut raw: RawConfigFile, args: &CliArgs) -> RawConfigFile {
    let non_empty = |list: &[String]| -> Vec<String> {
        list.iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    };

    let include = non_empty(&args.include_dir);
    if !include.is_empty() {
        raw.criteria.include_dir = include;
    }
    let users = non_empty(&args.exclude_user);
    if !users.is_empty() {
        raw.criteria.exclude_user = users;
    }
    let messages = non_empty(&args.exclude_msg);
    if !messages.is_empty() {
        raw.criteria.exclude_msg = messages;
    }

    if let Some(secs) = args.build_timeout {
        raw.build.timeout_secs = secs;
    }
    if let Some(ref name) = args.conf {
        raw.build.record_file = name.clone();
    }
    if args.commit_watermark {
        raw.build.commit_watermark = true;
    }

    raw
}

/// `<repo>/Buildgate.toml`.
pub fn default_config_path(repo: &Path) -> PathBuf {
    repo.join(DEFAULT_CONFIG_FILE)
}
