// src/exec/backend.rs

//! Pluggable build executor abstraction.
//!
//! The pipeline talks to a `BuildExecutor` instead of spawning processes
//! itself, so tests can script outcomes without running any build tool.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use super::outcome::DirectoryBuildOutcome;

/// Boxed future returned by [`BuildExecutor::build`].
pub type BuildFuture<'a> = Pin<Box<dyn Future<Output = DirectoryBuildOutcome> + Send + 'a>>;

/// Runs the project build for one directory.
///
/// Every failure mode (missing descriptor, non-zero exit, timeout, spawn
/// error) is expressed in the returned outcome; nothing here aborts the
/// run.
pub trait BuildExecutor: Send + Sync {
    fn build<'a>(&'a self, directory: &'a str, timeout: Duration) -> BuildFuture<'a>;
}
