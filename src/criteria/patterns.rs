// src/criteria/patterns.rs

use std::fmt;

use regex::{Regex, RegexSet};

use crate::errors::{BuildgateError, Result};

/// A compiled list of user-supplied regex fragments.
///
/// Matching is an **unanchored substring match**: a pattern matches when it
/// matches anywhere in the subject, the same as wrapping it in `.*<p>.*`.
/// Anchors written by the user (`^`, `$`) keep their usual meaning relative
/// to the whole subject. Matching is case-sensitive.
///
/// The original pattern strings are kept because include patterns double as
/// directory paths.
#[derive(Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: RegexSet,
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSet")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl PatternSet {
    /// Compile `patterns`, failing on the first invalid one.
    ///
    /// `kind` names the list in error messages ("user", "message", ...).
    pub fn compile(kind: &'static str, patterns: &[String]) -> Result<Self> {
        // Compile individually first so the error names the culprit.
        for pat in patterns {
            Regex::new(pat).map_err(|source| BuildgateError::InvalidPattern {
                kind,
                pattern: pat.clone(),
                source,
            })?;
        }

        let set = RegexSet::new(patterns).map_err(|source| BuildgateError::InvalidPattern {
            kind,
            pattern: patterns.join(","),
            source,
        })?;

        Ok(Self {
            patterns: patterns.to_vec(),
            set,
        })
    }

    /// An empty set, which matches nothing.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: RegexSet::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Pattern strings in configuration order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// True if any pattern matches anywhere in `subject`.
    pub fn matches_any(&self, subject: &str) -> bool {
        self.set.is_match(subject)
    }

    /// Indices of every pattern matching `subject`.
    pub fn matching_indices(&self, subject: &str) -> impl Iterator<Item = usize> + '_ {
        self.set.matches(subject).into_iter()
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::empty()
    }
}
