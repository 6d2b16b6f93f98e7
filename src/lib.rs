// src/lib.rs

pub mod cli;
pub mod config;
pub mod criteria;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod pipeline;
pub mod publish;
pub mod report;
pub mod revision;
pub mod watermark;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_settings;
use crate::engine::BuildDecision;
use crate::exec::CommandExecutor;
use crate::fs::{FileSystem, RealFileSystem};
use crate::pipeline::{Pipeline, RunOptions, RunSummary};
use crate::publish::{GitPublisher, WatermarkPublisher};
use crate::revision::{GitCli, RevisionRange};
use crate::watermark::FileWatermarkStore;

/// High-level entry point used by `main.rs`. Returns the process exit code.
///
/// This wires together:
/// - config loading (file + flags) and fail-fast pattern compilation
/// - the git revision provider and the file watermark store
/// - the decision fold, on a blocking thread
/// - the build executor and (optionally) the watermark publisher
pub async fn run(args: CliArgs) -> Result<i32> {
    let settings = load_settings(&args)?;
    let criteria = settings.compiled_criteria().clone();
    debug!(?criteria, "criteria compiled");

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let build = settings.build();

    let store = FileWatermarkStore::new(fs.clone(), &args.repo, build.record_file.clone());
    let executor = CommandExecutor::make(fs, &args.repo).with_descriptor(build.descriptor.clone());
    let publisher = build
        .commit_watermark
        .then(|| Box::new(GitPublisher::new(&args.repo)) as Box<dyn WatermarkPublisher>);

    let range = match &args.since {
        Some(base) => RevisionRange::since(base.clone()),
        None => RevisionRange::all_history(),
    };
    let options = RunOptions {
        dry_run: args.test,
        build_tag: args.build_tag.clone(),
        ..RunOptions::from_settings(&settings, range)
    };

    let pipeline = Pipeline::new(criteria, Box::new(store), Box::new(executor), options)
        .with_publisher(publisher);
    let provider = GitCli::new(&args.repo);

    let (mut pipeline, decision) = tokio::task::spawn_blocking(move || {
        let decision = pipeline.decide(&provider);
        (pipeline, decision)
    })
    .await
    .context("decision task failed")?;
    let decision = decision?;

    print_decision(&decision, args.verbose);

    let summary = pipeline.execute(decision).await;
    print_summary(&summary, args.verbose);

    let code = summary.exit_code();
    info!(exit_code = code, "run finished");
    Ok(code)
}

fn print_decision(decision: &BuildDecision, verbose: bool) {
    if verbose {
        for rev in &decision.qualifying {
            println!("{} : {:?}", rev.id, rev.directories);
        }
    }

    if decision.must_run {
        println!("Build must RUN");
        for dir in &decision.directories {
            println!("  - {dir}");
        }
    } else {
        println!("NO build to perform, criteria not met");
    }
}

fn print_summary(summary: &RunSummary, verbose: bool) {
    if summary.dry_run && summary.decision.must_run {
        println!("Dry-run only enabled, not running any build");
        return;
    }
    if !summary.report.is_empty() {
        print!("{}", summary.report.render(verbose));
    }
}
