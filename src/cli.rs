// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `buildgate`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "buildgate",
    version,
    about = "Decide from git history which directories CI must build, build them, and record success.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory patterns to build when a commit touches them.
    ///
    /// Comma-separated and/or repeated. Each entry is a regex matched
    /// anywhere in a changed path. At least one is required, either here or
    /// in the config file.
    #[arg(long, short = 'D', value_name = "DIRS", value_delimiter = ',')]
    pub include_dir: Vec<String>,

    /// Author patterns (name or email) whose commits never trigger a build.
    #[arg(long, short = 'u', value_name = "USERS", value_delimiter = ',')]
    pub exclude_user: Vec<String>,

    /// Commit message patterns that prevent a commit from triggering a build.
    #[arg(long, short = 'm', value_name = "PATTERNS", value_delimiter = ',')]
    pub exclude_msg: Vec<String>,

    /// Timeout for ONE directory build, in seconds.
    #[arg(long, short = 'b', value_name = "SECS")]
    pub build_timeout: Option<u64>,

    /// Name of the watermark record file kept in each directory.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub conf: Option<String>,

    /// Only examine revisions after this one (exclusive). All history when
    /// omitted.
    #[arg(long, value_name = "REV")]
    pub since: Option<String>,

    /// Repository checkout to work in.
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,

    /// Optional TOML config file.
    ///
    /// Default: `Buildgate.toml` in the repository, read only if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dry run: decide and print, but build nothing and write no watermark.
    #[arg(long, short = 't')]
    pub test: bool,

    /// Print per-revision decisions and captured build output.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// After a successful build, commit the updated watermark record.
    #[arg(long)]
    pub commit_watermark: bool,

    /// CI build identifier appended to watermark commit messages.
    #[arg(long, env = "BUILD_TAG", value_name = "TAG")]
    pub build_tag: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BUILDGATE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
