// src/revision/mod.rs

//! Revision enumeration and metadata.
//!
//! The decision engine never talks to a version-control tool directly; it
//! consumes a lazy stream of [`Revision`]s produced from a
//! [`RevisionProvider`]:
//!
//! - [`git`] shells out to the `git` binary and streams `rev-list` output.
//! - [`memory`] serves a fixed, in-memory history (tests, embedding).

pub mod git;
pub mod memory;

pub use git::{parse_show_output, GitCli};
pub use memory::InMemoryRevisions;

use crate::errors::Result;

/// Opaque revision identifier (a commit hash for git).
pub type RevisionId = String;

/// Seconds since the Unix epoch.
pub type Timestamp = i64;

/// Metadata for one revision. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub id: RevisionId,
    pub author_name: String,
    pub author_email: String,
    /// Full commit message; criteria only look at its first line.
    pub message: String,
    pub commit_timestamp: Timestamp,
    pub changed_paths: Vec<String>,
}

/// Which revisions to examine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionRange {
    /// Exclusive lower bound. `None` means all history.
    pub baseline: Option<RevisionId>,
}

impl RevisionRange {
    pub fn all_history() -> Self {
        Self { baseline: None }
    }

    pub fn since<S: Into<RevisionId>>(baseline: S) -> Self {
        Self {
            baseline: Some(baseline.into()),
        }
    }
}

/// Lazy, finite, single-pass sequence of revision ids.
pub type RevisionIds<'a> = Box<dyn Iterator<Item = Result<RevisionId>> + 'a>;

/// Lazy sequence of fully fetched revisions.
pub type RevisionStream<'a> = Box<dyn Iterator<Item = Result<Revision>> + 'a>;

/// Source of revision ids and per-revision metadata.
pub trait RevisionProvider {
    /// Revisions in `range`, in the provider's natural order (newest first
    /// for git).
    fn revision_ids(&self, range: &RevisionRange) -> Result<RevisionIds<'_>>;

    /// Fetch author, message, timestamp and changed paths for `id`.
    fn metadata(&self, id: &str) -> Result<Revision>;
}

/// Stream full revisions for `range`, fetching metadata one id at a time.
///
/// The first error ends the stream from the caller's point of view; the
/// engine stops folding at that point.
pub fn revisions<'a, P>(provider: &'a P, range: &RevisionRange) -> Result<RevisionStream<'a>>
where
    P: RevisionProvider + ?Sized,
{
    let ids = provider.revision_ids(range)?;
    Ok(Box::new(
        ids.map(move |id| id.and_then(|id| provider.metadata(&id))),
    ))
}
