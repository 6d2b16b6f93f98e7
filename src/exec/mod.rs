// src/exec/mod.rs

//! Build execution layer.
//!
//! - [`backend`] defines the `BuildExecutor` trait the pipeline drives.
//! - [`command`] is the production implementation: it runs the build tool
//!   with `tokio::process::Command` under a hard timeout.
//! - [`outcome`] holds the per-directory result types.

pub mod backend;
pub mod command;
pub mod outcome;

pub use backend::{BuildExecutor, BuildFuture};
pub use command::CommandExecutor;
pub use outcome::{BuildStatus, DirectoryBuildOutcome};
