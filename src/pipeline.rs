// src/pipeline.rs

//! The sequential run: decide, build each directory, record success.
//!
//! Deciding is synchronous (the revision stream is blocking IO); building
//! is async so the executor can enforce its timeout. Builds never overlap,
//! and a directory's watermark is written right after its own build
//! succeeds, so writes happen in build-completion order.

use std::fmt;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::Settings;
use crate::criteria::Criteria;
use crate::engine::{decide_range, BuildDecision};
use crate::errors::Result;
use crate::exec::{BuildExecutor, DirectoryBuildOutcome};
use crate::publish::{commit_message, WatermarkPublisher};
use crate::report::BuildReport;
use crate::revision::{RevisionProvider, RevisionRange};
use crate::watermark::WatermarkStore;

/// Per-invocation options that are not part of the checked config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub range: RevisionRange,
    pub build_timeout: Duration,
    /// Decide only; no build, no watermark write.
    pub dry_run: bool,
    pub build_tag: Option<String>,
}

impl RunOptions {
    pub fn from_settings(settings: &Settings, range: RevisionRange) -> Self {
        Self {
            range,
            build_timeout: settings.build().timeout(),
            dry_run: false,
            build_tag: None,
        }
    }
}

/// What a run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub decision: BuildDecision,
    pub report: BuildReport,
    pub dry_run: bool,
    /// Directories whose watermark was updated, in write order.
    pub watermarks_written: Vec<String>,
}

impl RunSummary {
    /// 0 when nothing had to be built or every attempted build succeeded.
    pub fn exit_code(&self) -> i32 {
        if self.report.all_succeeded() { 0 } else { 1 }
    }
}

pub struct Pipeline {
    criteria: Criteria,
    store: Box<dyn WatermarkStore>,
    executor: Box<dyn BuildExecutor>,
    publisher: Option<Box<dyn WatermarkPublisher>>,
    options: RunOptions,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("criteria", &self.criteria)
            .field("options", &self.options)
            .field("publishes", &self.publisher.is_some())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(
        criteria: Criteria,
        store: Box<dyn WatermarkStore>,
        executor: Box<dyn BuildExecutor>,
        options: RunOptions,
    ) -> Self {
        Self {
            criteria,
            store,
            executor,
            publisher: None,
            options,
        }
    }

    pub fn with_publisher(mut self, publisher: Option<Box<dyn WatermarkPublisher>>) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn store(&self) -> &dyn WatermarkStore {
        self.store.as_ref()
    }

    /// Fold the configured range into a decision. Blocking.
    pub fn decide<P>(&self, provider: &P) -> Result<BuildDecision>
    where
        P: RevisionProvider + ?Sized,
    {
        decide_range(&self.criteria, provider, &self.options.range, self.store.as_ref())
    }

    /// Build every selected directory in order and record successes.
    pub async fn execute(&mut self, decision: BuildDecision) -> RunSummary {
        let mut summary = RunSummary {
            decision,
            report: BuildReport::new(),
            dry_run: self.options.dry_run,
            watermarks_written: Vec::new(),
        };

        if !summary.decision.must_run {
            info!("no revision met the build criteria");
            return summary;
        }

        if self.options.dry_run {
            info!(directories = ?summary.decision.directories, "dry run; skipping builds");
            return summary;
        }

        let newest = summary.decision.newest_qualifying_timestamp;
        for directory in &summary.decision.directories {
            let outcome = self
                .executor
                .build(directory, self.options.build_timeout)
                .await;

            if outcome.succeeded() && self.record_success(&outcome, newest).await {
                summary.watermarks_written.push(directory.clone());
            }

            summary.report.push(outcome);
        }

        summary
    }

    /// Decide, then execute.
    pub async fn run<P>(mut self, provider: &P) -> Result<RunSummary>
    where
        P: RevisionProvider + ?Sized,
    {
        let decision = self.decide(provider)?;
        Ok(self.execute(decision).await)
    }

    /// Write the watermark (and optionally commit it). Failures are
    /// warnings: the next run will simply rebuild the directory.
    async fn record_success(&mut self, outcome: &DirectoryBuildOutcome, timestamp: i64) -> bool {
        let directory = outcome.directory.as_str();

        if let Err(e) = self.store.write(directory, timestamp) {
            warn!(
                directory = %directory,
                error = %e,
                "could not record watermark; directory will be rebuilt next run"
            );
            return false;
        }

        if let Some(publisher) = &self.publisher {
            match self.store.location(directory) {
                Some(record) => {
                    let message = commit_message(directory, self.options.build_tag.as_deref());
                    if let Err(e) = publisher.publish(directory, &record, &message).await {
                        warn!(directory = %directory, error = %e, "could not commit watermark record");
                    }
                }
                None => warn!(directory = %directory, "watermark store has no file to commit"),
            }
        }

        true
    }
}
