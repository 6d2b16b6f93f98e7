// src/exec/command.rs

//! Process-backed build executor (`make -C <dir>` by default).

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::backend::{BuildExecutor, BuildFuture};
use super::outcome::DirectoryBuildOutcome;
use crate::config::model::DEFAULT_DESCRIPTOR;
use crate::fs::FileSystem;

/// Placeholder replaced by the directory path in command arguments.
pub const DIR_PLACEHOLDER: &str = "{dir}";

/// How long to wait for output readers after the build process is gone.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(500);

type OutputBuffer = Arc<Mutex<Vec<String>>>;

/// Runs a build command for each directory that contains a build
/// descriptor.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    descriptor: String,
    program: String,
    args: Vec<String>,
}

impl CommandExecutor {
    /// `make -C <root>/<dir>`, requiring a `Makefile`.
    pub fn make(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
            descriptor: DEFAULT_DESCRIPTOR.to_string(),
            program: "make".to_string(),
            args: vec!["-C".to_string(), DIR_PLACEHOLDER.to_string()],
        }
    }

    /// File whose presence marks a directory as buildable.
    pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptor = descriptor.into();
        self
    }

    /// Replace the build command. `{dir}` in `args` expands to the
    /// directory path; the process always runs inside that directory.
    pub fn with_command<I, S>(mut self, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.program = program.into();
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    fn directory_path(&self, directory: &str) -> PathBuf {
        self.root.join(directory)
    }

    async fn run(&self, directory: &str, timeout: Duration) -> DirectoryBuildOutcome {
        let dir_path = self.directory_path(directory);

        if !self.fs.is_file(&dir_path.join(&self.descriptor)) {
            info!(
                directory = %directory,
                descriptor = %self.descriptor,
                "no build descriptor; skipping"
            );
            return DirectoryBuildOutcome::skipped(directory, &self.descriptor);
        }

        // The child runs inside the directory, so `{dir}` must not be
        // relative to the caller's working directory.
        let dir_path = match std::path::absolute(&dir_path) {
            Ok(path) => path,
            Err(e) => {
                warn!(directory = %directory, error = %e, "cannot resolve build directory");
                return DirectoryBuildOutcome::error(directory, e);
            }
        };
        let dir_arg = dir_path.to_string_lossy().into_owned();
        let args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace(DIR_PLACEHOLDER, &dir_arg))
            .collect();

        info!(
            directory = %directory,
            program = %self.program,
            args = ?args,
            timeout_secs = timeout.as_secs(),
            "starting build"
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&args)
            .current_dir(&dir_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let started = Instant::now();
        let mut child = match cmd
            .spawn()
            .with_context(|| format!("spawning `{}` for directory '{}'", self.program, directory))
        {
            Ok(child) => child,
            Err(e) => {
                warn!(directory = %directory, error = %e, "build process failed to start");
                return DirectoryBuildOutcome::error(directory, format!("{e:#}"));
            }
        };

        let output: OutputBuffer = Arc::new(Mutex::new(Vec::new()));
        let readers = capture_output(&mut child, directory, &output);

        let waited = tokio::time::timeout(timeout, child.wait()).await;
        let elapsed = started.elapsed();

        match waited {
            Ok(Ok(status)) => {
                drain(readers).await;
                let lines = take_lines(&output);
                info!(
                    directory = %directory,
                    exit_code = status.code().unwrap_or(-1),
                    success = status.success(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "build process exited"
                );
                if status.success() {
                    DirectoryBuildOutcome::success(directory, elapsed, lines)
                } else {
                    DirectoryBuildOutcome::failure(directory, status.code(), elapsed, lines)
                }
            }
            Ok(Err(e)) => {
                drain(readers).await;
                warn!(directory = %directory, error = %e, "waiting for build process failed");
                DirectoryBuildOutcome::error(directory, e)
            }
            Err(_) => {
                warn!(
                    directory = %directory,
                    timeout_secs = timeout.as_secs(),
                    "build timed out; killing process"
                );
                if let Err(e) = kill(&mut child).await {
                    warn!(directory = %directory, error = %e, "failed to kill build process");
                }
                drain(readers).await;
                DirectoryBuildOutcome::timed_out(directory, timeout, take_lines(&output))
            }
        }
    }
}

impl BuildExecutor for CommandExecutor {
    fn build<'a>(&'a self, directory: &'a str, timeout: Duration) -> BuildFuture<'a> {
        Box::pin(self.run(directory, timeout))
    }
}

/// Spawn one reader per pipe, appending lines to `output` as they arrive.
fn capture_output(child: &mut Child, directory: &str, output: &OutputBuffer) -> Vec<JoinHandle<()>> {
    let mut readers = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        readers.push(spawn_reader(stdout, directory.to_string(), "stdout", output.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(spawn_reader(stderr, directory.to_string(), "stderr", output.clone()));
    }
    readers
}

fn spawn_reader<R>(pipe: R, directory: String, stream: &'static str, output: OutputBuffer) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(pipe).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(directory = %directory, "{stream}: {line}");
            if let Ok(mut buf) = output.lock() {
                buf.push(line);
            }
        }
    })
}

/// Wait briefly for readers; grandchildren may keep a pipe open after the
/// build process itself is gone.
async fn drain(readers: Vec<JoinHandle<()>>) {
    for mut reader in readers {
        if tokio::time::timeout(OUTPUT_DRAIN_GRACE, &mut reader).await.is_err() {
            debug!("output reader still open after grace period; abandoning it");
            reader.abort();
        }
    }
}

fn take_lines(output: &OutputBuffer) -> Vec<String> {
    match output.lock() {
        Ok(mut buf) => std::mem::take(&mut *buf),
        Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
    }
}

async fn kill(child: &mut Child) -> Result<()> {
    child.kill().await.context("killing build process")?;
    Ok(())
}
