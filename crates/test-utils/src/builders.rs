#![allow(dead_code)]

use buildgate::config::{BuildSection, CriteriaSection, RawConfigFile, Settings};
use buildgate::criteria::Criteria;
use buildgate::revision::{Revision, Timestamp};

/// Builder for `Revision` to simplify test setup.
pub struct RevisionBuilder {
    revision: Revision,
}

impl RevisionBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            revision: Revision {
                id: id.to_string(),
                author_name: "alice".to_string(),
                author_email: "alice@example.com".to_string(),
                message: "change".to_string(),
                commit_timestamp: 0,
                changed_paths: Vec::new(),
            },
        }
    }

    pub fn author(mut self, name: &str, email: &str) -> Self {
        self.revision.author_name = name.to_string();
        self.revision.author_email = email.to_string();
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.revision.message = message.to_string();
        self
    }

    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.revision.commit_timestamp = timestamp;
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.revision.changed_paths.push(path.to_string());
        self
    }

    pub fn build(self) -> Revision {
        self.revision
    }
}

/// Builder for `RawConfigFile` / `Settings`.
pub struct SettingsBuilder {
    config: RawConfigFile,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                criteria: CriteriaSection::default(),
                build: BuildSection::default(),
            },
        }
    }

    pub fn include_dir(mut self, pattern: &str) -> Self {
        self.config.criteria.include_dir.push(pattern.to_string());
        self
    }

    pub fn exclude_user(mut self, pattern: &str) -> Self {
        self.config.criteria.exclude_user.push(pattern.to_string());
        self
    }

    pub fn exclude_msg(mut self, pattern: &str) -> Self {
        self.config.criteria.exclude_msg.push(pattern.to_string());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.build.timeout_secs = secs;
        self
    }

    pub fn record_file(mut self, name: &str) -> Self {
        self.config.build.record_file = name.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> Settings {
        Settings::try_from(self.config).expect("Failed to build valid settings from builder")
    }

    /// Compiled criteria for the configured patterns.
    pub fn criteria(self) -> Criteria {
        self.build().compiled_criteria().clone()
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
