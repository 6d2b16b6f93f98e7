// src/revision/git.rs

//! `git` command-line backed revision provider.

use std::io::{BufRead, BufReader, Lines, Read};
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};

use anyhow::Context;
use tracing::{debug, warn};

use super::{Revision, RevisionId, RevisionIds, RevisionProvider, RevisionRange};
use crate::errors::{BuildgateError, Result};

/// `git show` header: author name, author email, committer timestamp and raw
/// body, NUL-separated so multi-line messages cannot confuse the parser. The
/// changed file list follows the last NUL.
const SHOW_FORMAT: &str = "--format=%aN%x00%aE%x00%ct%x00%B%x00";

/// Revision provider that runs `git` in a repository checkout.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo: PathBuf,
}

impl GitCli {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(&self.repo)
            .args(["-c", "core.quotepath=off"]);
        cmd
    }

    /// True when the repository exists but has no commit yet.
    ///
    /// `rev-parse --verify -q` exits 1 for a missing ref and 128 for
    /// anything worse (not a repository), which is left for `rev-list`
    /// to report.
    fn head_is_unborn(&self) -> Result<bool> {
        let status = self
            .git()
            .args(["rev-parse", "--verify", "-q", "HEAD"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("spawning `git rev-parse HEAD` in {:?}", self.repo))?;
        Ok(status.code() == Some(1))
    }
}

impl RevisionProvider for GitCli {
    fn revision_ids(&self, range: &RevisionRange) -> Result<RevisionIds<'_>> {
        let spec = match &range.baseline {
            Some(base) => format!("{base}..HEAD"),
            None => {
                if self.head_is_unborn()? {
                    debug!(repo = ?self.repo, "repository has no commits; empty history");
                    return Ok(Box::new(std::iter::empty()));
                }
                "HEAD".to_string()
            }
        };
        debug!(range = %spec, repo = ?self.repo, "listing revisions");

        let mut cmd = self.git();
        cmd.args(["rev-list", &spec])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning `git rev-list {spec}` in {:?}", self.repo))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BuildgateError::Metadata("git rev-list has no stdout".to_string()))?;

        Ok(Box::new(RevList {
            spec,
            child,
            lines: BufReader::new(stdout).lines(),
            finished: false,
        }))
    }

    fn metadata(&self, id: &str) -> Result<Revision> {
        let output = self
            .git()
            .args(["show", "--no-color", "--name-only", SHOW_FORMAT, id])
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("spawning `git show {id}` in {:?}", self.repo))?;

        if !output.status.success() {
            return Err(BuildgateError::Metadata(format!(
                "`git show {id}` failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        parse_show_output(id, &text)
    }
}

/// Streaming reader over `git rev-list` output.
///
/// Ids are yielded as the child prints them; the exit status is checked
/// once stdout is exhausted, so a bad baseline surfaces as a final error.
struct RevList {
    spec: String,
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
    finished: bool,
}

impl RevList {
    fn finish(&mut self) -> Option<Result<RevisionId>> {
        self.finished = true;

        let status = match self.child.wait() {
            Ok(status) => status,
            Err(e) => {
                return Some(Err(BuildgateError::Metadata(format!(
                    "waiting for `git rev-list {}`: {e}",
                    self.spec
                ))));
            }
        };

        if status.success() {
            return None;
        }

        let mut stderr = String::new();
        if let Some(mut pipe) = self.child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }
        Some(Err(BuildgateError::Metadata(format!(
            "`git rev-list {}` failed ({status}): {}",
            self.spec,
            stderr.trim()
        ))))
    }
}

impl Iterator for RevList {
    type Item = Result<RevisionId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    let id = line.trim().trim_matches('"');
                    if id.is_empty() {
                        continue;
                    }
                    return Some(Ok(id.to_string()));
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(BuildgateError::Metadata(format!(
                        "reading `git rev-list {}` output: {e}",
                        self.spec
                    ))));
                }
                None => return self.finish(),
            }
        }
    }
}

impl Drop for RevList {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        // Abandoned mid-stream (e.g. a metadata error): don't leave git behind.
        if let Err(e) = self.child.kill() {
            debug!(error = %e, "git rev-list already exited");
        }
        if let Err(e) = self.child.wait() {
            warn!(error = %e, "failed to reap git rev-list");
        }
    }
}

/// Parse the output of `git show --name-only` with [`SHOW_FORMAT`].
pub fn parse_show_output(id: &str, text: &str) -> Result<Revision> {
    let malformed =
        |what: &str| BuildgateError::Metadata(format!("malformed `git show` output for {id}: {what}"));

    let mut fields = text.splitn(5, '\0');
    let author_name = fields.next().ok_or_else(|| malformed("missing author name"))?;
    let author_email = fields.next().ok_or_else(|| malformed("missing author email"))?;
    let raw_ts = fields.next().ok_or_else(|| malformed("missing timestamp"))?;
    let message = fields.next().ok_or_else(|| malformed("missing message"))?;
    let files = fields.next().ok_or_else(|| malformed("missing file list"))?;

    let commit_timestamp = raw_ts
        .trim()
        .parse::<i64>()
        .map_err(|e| malformed(&format!("timestamp {raw_ts:?}: {e}")))?;

    let changed_paths = files
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    Ok(Revision {
        id: id.to_string(),
        author_name: author_name.trim().to_string(),
        author_email: author_email.trim().to_string(),
        message: message.trim_end().to_string(),
        commit_timestamp,
        changed_paths,
    })
}
