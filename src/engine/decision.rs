// src/engine/decision.rs

//! The build decision fold.
//!
//! One pass over the revision sequence, no backtracking. Each revision is
//! classified by [`Criteria`]; touched directories are kept only if their
//! watermark is older than the revision (or missing). The accumulated state
//! is the [`BuildDecision`].

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace, warn};

use crate::criteria::{Classification, Criteria};
use crate::errors::Result;
use crate::revision::{Revision, RevisionId, Timestamp};
use crate::watermark::WatermarkStore;

/// A revision that put at least one directory into the build set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedRevision {
    pub id: RevisionId,
    pub commit_timestamp: Timestamp,
    /// Directories this revision made eligible.
    pub directories: Vec<String>,
}

/// Result of folding a revision range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildDecision {
    pub must_run: bool,
    /// Deduplicated, in order of first qualification.
    pub directories: Vec<String>,
    /// Max commit timestamp over qualifying revisions; 0 when none qualified.
    pub newest_qualifying_timestamp: Timestamp,
    pub revisions_examined: usize,
    pub qualifying: Vec<QualifiedRevision>,
}

impl BuildDecision {
    pub fn contains(&self, directory: &str) -> bool {
        self.directories.iter().any(|d| d == directory)
    }
}

/// Watermark as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KnownWatermark {
    /// No usable record: eligible for any revision.
    NeverBuilt,
    BuiltAt(Timestamp),
}

impl KnownWatermark {
    fn is_older_than(self, commit_timestamp: Timestamp) -> bool {
        match self {
            KnownWatermark::NeverBuilt => true,
            KnownWatermark::BuiltAt(ts) => ts < commit_timestamp,
        }
    }
}

/// Fold state. Watermarks are looked up once per directory per run, so the
/// store is not re-read and each warning is logged once.
struct Fold<'a> {
    criteria: &'a Criteria,
    store: &'a dyn WatermarkStore,
    watermarks: HashMap<String, KnownWatermark>,
    seen: HashSet<String>,
    decision: BuildDecision,
}

impl<'a> Fold<'a> {
    fn new(criteria: &'a Criteria, store: &'a dyn WatermarkStore) -> Self {
        Self {
            criteria,
            store,
            watermarks: HashMap::new(),
            seen: HashSet::new(),
            decision: BuildDecision::default(),
        }
    }

    fn watermark(&mut self, directory: &str) -> KnownWatermark {
        if let Some(known) = self.watermarks.get(directory) {
            return *known;
        }

        let known = match self.store.read(directory) {
            Ok(Some(ts)) => KnownWatermark::BuiltAt(ts),
            Ok(None) => {
                warn!(
                    directory = %directory,
                    "no watermark record found; directory will be built"
                );
                KnownWatermark::NeverBuilt
            }
            Err(e) => {
                warn!(
                    directory = %directory,
                    error = %e,
                    "unreadable watermark record; treating directory as never built"
                );
                KnownWatermark::NeverBuilt
            }
        };

        self.watermarks.insert(directory.to_string(), known);
        known
    }

    fn step(mut self, revision: Revision) -> Self {
        self.decision.revisions_examined += 1;

        let criteria = self.criteria;
        let touched = match criteria.classify(&revision) {
            Classification::ExcludedByUser => {
                trace!(revision = %revision.id, author = %revision.author_name, "excluded by author");
                return self;
            }
            Classification::ExcludedByMessage => {
                trace!(revision = %revision.id, "excluded by message");
                return self;
            }
            Classification::Touches(dirs) => dirs,
        };

        let mut eligible = Vec::new();
        for dir in touched {
            let watermark = self.watermark(dir);
            if watermark.is_older_than(revision.commit_timestamp) {
                eligible.push(dir.to_string());
            } else {
                trace!(
                    revision = %revision.id,
                    directory = %dir,
                    "already built at or after this revision"
                );
            }
        }

        if eligible.is_empty() {
            return self;
        }

        debug!(revision = %revision.id, directories = ?eligible, "revision qualifies");

        for dir in &eligible {
            if self.seen.insert(dir.clone()) {
                self.decision.directories.push(dir.clone());
            }
        }

        self.decision.must_run = true;
        self.decision.newest_qualifying_timestamp = self
            .decision
            .newest_qualifying_timestamp
            .max(revision.commit_timestamp);
        self.decision.qualifying.push(QualifiedRevision {
            id: revision.id,
            commit_timestamp: revision.commit_timestamp,
            directories: eligible,
        });

        self
    }
}

/// Fold `revisions` into a [`BuildDecision`].
///
/// The first `Err` from the sequence aborts the whole decision: without
/// complete metadata the run cannot decide safely.
pub fn decide<I>(criteria: &Criteria, revisions: I, store: &dyn WatermarkStore) -> Result<BuildDecision>
where
    I: IntoIterator<Item = Result<Revision>>,
{
    let fold = revisions
        .into_iter()
        .try_fold(Fold::new(criteria, store), |fold, revision| {
            revision.map(|rev| fold.step(rev))
        })?;

    let decision = fold.decision;
    debug!(
        examined = decision.revisions_examined,
        qualifying = decision.qualifying.len(),
        directories = ?decision.directories,
        newest = decision.newest_qualifying_timestamp,
        "build decision complete"
    );
    Ok(decision)
}
