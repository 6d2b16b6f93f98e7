// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::criteria::Criteria;

/// Default per-directory build timeout, in seconds.
pub const DEFAULT_BUILD_TIMEOUT_SECS: u64 = 60;

/// Default name of the watermark record kept in each included directory.
pub const DEFAULT_RECORD_FILE: &str = "jenkins-build.cfg";

/// Default build descriptor looked up in each directory.
pub const DEFAULT_DESCRIPTOR: &str = "Makefile";

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [criteria]
/// exclude_user = ["ci-bot"]
/// exclude_msg = ["\\[skip ci\\]"]
/// include_dir = ["libs/core", "apps/web"]
///
/// [build]
/// timeout_secs = 60
/// record_file = "jenkins-build.cfg"
/// descriptor = "Makefile"
/// commit_watermark = false
/// ```
///
/// Every section is optional. Command-line flags are merged on top by
/// [`crate::config::loader::load_settings`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub criteria: CriteriaSection,

    #[serde(default)]
    pub build: BuildSection,
}

/// `[criteria]` section: which commits and directories count.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CriteriaSection {
    /// Author patterns (matched against name and email).
    #[serde(default)]
    pub exclude_user: Vec<String>,

    /// Patterns matched against the first line of the commit message.
    #[serde(default)]
    pub exclude_msg: Vec<String>,

    /// Directory patterns, in the order they should be considered.
    #[serde(default)]
    pub include_dir: Vec<String>,
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BuildSection {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_record_file")]
    pub record_file: String,

    /// File whose presence marks a directory as buildable.
    #[serde(default = "default_descriptor")]
    pub descriptor: String,

    #[serde(default)]
    pub commit_watermark: bool,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_BUILD_TIMEOUT_SECS
}

fn default_record_file() -> String {
    DEFAULT_RECORD_FILE.to_string()
}

fn default_descriptor() -> String {
    DEFAULT_DESCRIPTOR.to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            record_file: default_record_file(),
            descriptor: default_descriptor(),
            commit_watermark: false,
        }
    }
}

impl BuildSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`),
/// so holders can rely on a non-empty include list, a sane record name and
/// patterns that already compiled.
#[derive(Debug, Clone)]
pub struct Settings {
    criteria: CriteriaSection,
    build: BuildSection,
    compiled: Criteria,
}

impl Settings {
    pub(crate) fn new_unchecked(criteria: CriteriaSection, build: BuildSection, compiled: Criteria) -> Self {
        Self {
            criteria,
            build,
            compiled,
        }
    }

    /// Criteria compiled from the `[criteria]` section during validation.
    pub fn compiled_criteria(&self) -> &Criteria {
        &self.compiled
    }

    pub fn criteria(&self) -> &CriteriaSection {
        &self.criteria
    }

    pub fn build(&self) -> &BuildSection {
        &self.build
    }
}
