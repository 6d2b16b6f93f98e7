// src/publish.rs

//! Committing updated watermark records back to the repository.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, Context};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::Result;

/// Upper bound for each `git add` / `git commit` call.
pub const GIT_OP_TIMEOUT: Duration = Duration::from_secs(20);

pub type PublishFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Records a freshly written watermark somewhere durable (a commit).
pub trait WatermarkPublisher: Send + Sync {
    fn publish<'a>(&'a self, directory: &'a str, record: &'a Path, message: &'a str) -> PublishFuture<'a>;
}

/// Commit message for a watermark update.
pub fn commit_message(directory: &str, build_tag: Option<&str>) -> String {
    let mut msg = format!("[buildgate] watermark after build for {directory}");
    if let Some(tag) = build_tag.filter(|t| !t.trim().is_empty()) {
        msg.push_str(" ; ");
        msg.push_str(tag.trim());
    }
    msg
}

/// Stages the record with `git add` and commits it.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    repo: PathBuf,
    timeout: Duration,
}

impl GitPublisher {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            timeout: GIT_OP_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn git(&self, args: &[&str]) -> Result<()> {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(&self.repo)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!(args = ?args, "running git");
        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| anyhow!("`git {}` timed out after {:?}", args.join(" "), self.timeout))?
            .with_context(|| format!("spawning `git {}`", args.join(" ")))?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "`git {}` failed ({}): {} {}",
                args.join(" "),
                output.status,
                stdout.trim(),
                stderr.trim()
            )
            .into());
        }
        Ok(())
    }

    async fn add_and_commit(&self, directory: &str, record: &Path, message: &str) -> Result<()> {
        // git -C resolves paths against the repository, not our cwd.
        let record = record.strip_prefix(&self.repo).unwrap_or(record).to_string_lossy();
        self.git(&["add", "--", &*record]).await?;
        self.git(&["commit", "-m", message, "--", &*record]).await?;
        info!(directory = %directory, record = %record, "committed watermark record");
        Ok(())
    }
}

impl WatermarkPublisher for GitPublisher {
    fn publish<'a>(&'a self, directory: &'a str, record: &'a Path, message: &'a str) -> PublishFuture<'a> {
        Box::pin(self.add_and_commit(directory, record, message))
    }
}
