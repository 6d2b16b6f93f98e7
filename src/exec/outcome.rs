// src/exec/outcome.rs

use std::fmt;
use std::time::Duration;

/// How a directory build attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    Succeeded,
    /// The build ran and exited non-zero (`None` when killed by a signal).
    Failed { exit_code: Option<i32> },
    /// Killed after exceeding the per-directory timeout.
    TimedOut,
    /// No build descriptor in the directory; nothing was run.
    Skipped,
    /// The build could not be started.
    Error,
}

impl BuildStatus {
    pub fn label(self) -> &'static str {
        match self {
            BuildStatus::Succeeded => "SUCCESS",
            BuildStatus::Failed { .. } => "FAILED",
            BuildStatus::TimedOut => "TIMEOUT",
            BuildStatus::Skipped => "SKIPPED",
            BuildStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one build attempt. Immutable once the attempt completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryBuildOutcome {
    pub directory: String,
    pub status: BuildStatus,
    pub message: String,
    /// Captured stdout and stderr lines, in arrival order.
    pub output: Vec<String>,
    pub elapsed: Duration,
}

impl DirectoryBuildOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == BuildStatus::Succeeded
    }

    pub fn success(directory: &str, elapsed: Duration, output: Vec<String>) -> Self {
        Self {
            directory: directory.to_string(),
            status: BuildStatus::Succeeded,
            message: format!("SUCCESS: build {directory} in {}", secs(elapsed)),
            output,
            elapsed,
        }
    }

    pub fn failure(directory: &str, exit_code: Option<i32>, elapsed: Duration, output: Vec<String>) -> Self {
        let code = exit_code.map_or_else(|| "killed by signal".to_string(), |c| format!("exit code {c}"));
        Self {
            directory: directory.to_string(),
            status: BuildStatus::Failed { exit_code },
            message: format!("ERROR: build {directory} failed after {} ({code})", secs(elapsed)),
            output,
            elapsed,
        }
    }

    pub fn timed_out(directory: &str, timeout: Duration, output: Vec<String>) -> Self {
        Self {
            directory: directory.to_string(),
            status: BuildStatus::TimedOut,
            message: format!("ERROR: build {directory} timed out after {}", secs(timeout)),
            output,
            elapsed: timeout,
        }
    }

    pub fn skipped(directory: &str, descriptor: &str) -> Self {
        Self {
            directory: directory.to_string(),
            status: BuildStatus::Skipped,
            message: format!("No {descriptor} available for {directory}; nothing to build"),
            output: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn error(directory: &str, reason: impl fmt::Display) -> Self {
        Self {
            directory: directory.to_string(),
            status: BuildStatus::Error,
            message: format!("ERROR: could not start build for {directory}: {reason}"),
            output: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }
}

fn secs(d: Duration) -> String {
    format!("{:.1}s", d.as_secs_f64())
}
