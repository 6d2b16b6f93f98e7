// src/criteria/mod.rs

//! Per-revision classification.
//!
//! Pure functions deciding whether a revision is excluded by its author or
//! message, and which included directories it touches. Nothing here reads
//! the filesystem or the watermark store.

pub mod patterns;

pub use patterns::PatternSet;

use crate::config::CriteriaSection;
use crate::errors::Result;
use crate::revision::Revision;

/// Compiled exclusion and inclusion criteria for one run.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    users: PatternSet,
    messages: PatternSet,
    include_dirs: PatternSet,
}

/// How a single revision was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification<'a> {
    ExcludedByUser,
    ExcludedByMessage,
    /// Include patterns touched by the revision; may be empty.
    Touches(Vec<&'a str>),
}

impl Criteria {
    pub fn new(users: PatternSet, messages: PatternSet, include_dirs: PatternSet) -> Self {
        Self {
            users,
            messages,
            include_dirs,
        }
    }

    /// Compile the `[criteria]` section.
    pub fn from_section(section: &CriteriaSection) -> Result<Self> {
        Ok(Self::new(
            PatternSet::compile("user", &section.exclude_user)?,
            PatternSet::compile("message", &section.exclude_msg)?,
            PatternSet::compile("directory", &section.include_dir)?,
        ))
    }

    /// Classify a revision. User exclusion is checked before message
    /// exclusion; either short-circuits the directory scan.
    pub fn classify<'a>(&'a self, revision: &Revision) -> Classification<'a> {
        if is_user_excluded(&revision.author_name, &revision.author_email, &self.users) {
            return Classification::ExcludedByUser;
        }
        if is_message_excluded(&revision.message, &self.messages) {
            return Classification::ExcludedByMessage;
        }
        Classification::Touches(directories_touched(
            &revision.changed_paths,
            &self.include_dirs,
        ))
    }
}

/// True if any user pattern matches the author's name or email.
pub fn is_user_excluded(author_name: &str, author_email: &str, users: &PatternSet) -> bool {
    users.matches_any(author_name) || users.matches_any(author_email)
}

/// True if any message pattern matches the first line of `message`.
pub fn is_message_excluded(message: &str, messages: &PatternSet) -> bool {
    messages.matches_any(subject_line(message))
}

/// Include patterns matched by at least one of `changed_paths`.
///
/// Each pattern appears at most once, in configuration order.
pub fn directories_touched<'a, S: AsRef<str>>(
    changed_paths: &[S],
    include_dirs: &'a PatternSet,
) -> Vec<&'a str> {
    let mut hit = vec![false; include_dirs.len()];

    for path in changed_paths {
        for idx in include_dirs.matching_indices(path.as_ref()) {
            hit[idx] = true;
        }
        if hit.iter().all(|h| *h) {
            break;
        }
    }

    include_dirs
        .patterns()
        .iter()
        .zip(hit)
        .filter_map(|(pat, touched)| touched.then_some(pat.as_str()))
        .collect()
}

fn subject_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}
