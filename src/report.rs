// src/report.rs

//! Result aggregation and the human-readable build report.

use std::fmt::Write as _;

use crate::exec::{BuildStatus, DirectoryBuildOutcome};

const RULE_WIDTH: usize = 50;

/// Outcomes of every build attempted in a run, in attempt order.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    outcomes: Vec<DirectoryBuildOutcome>,
}

impl BuildReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: DirectoryBuildOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[DirectoryBuildOutcome] {
        &self.outcomes
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// True iff every attempt succeeded; vacuously true with no attempts.
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(DirectoryBuildOutcome::succeeded)
    }

    /// Directories whose build did not succeed, skipped ones included.
    pub fn unsuccessful(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| !o.succeeded())
            .map(|o| o.directory.as_str())
    }

    /// Render every outcome. Captured output is included only when
    /// `verbose` is set.
    pub fn render(&self, verbose: bool) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let inner_rule = "#".repeat(RULE_WIDTH);
        let mut out = String::new();

        let _ = writeln!(out, "{rule}");
        for outcome in &self.outcomes {
            let _ = writeln!(out, " Directory : {}", outcome.directory);
            let _ = writeln!(out, " Status    : {}", outcome.status);
            let _ = writeln!(out, " Message   : {}", outcome.message);

            if verbose && outcome.status != BuildStatus::Skipped {
                let _ = writeln!(out, "\t{inner_rule}");
                for line in &outcome.output {
                    let _ = writeln!(out, "\t{line}");
                }
                let _ = writeln!(out, "\t{inner_rule}");
            }
            let _ = writeln!(out, "{rule}");
        }

        let succeeded = self.outcomes.iter().filter(|o| o.succeeded()).count();
        let skipped = self
            .outcomes
            .iter()
            .filter(|o| o.status == BuildStatus::Skipped)
            .count();
        let _ = writeln!(
            out,
            " {} attempted, {} succeeded, {} skipped, {} failed",
            self.outcomes.len(),
            succeeded,
            skipped,
            self.outcomes.len() - succeeded - skipped
        );

        out
    }
}
