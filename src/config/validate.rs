// src/config/validate.rs

use std::path::{Component, Path};

use crate::config::model::{BuildSection, CriteriaSection, RawConfigFile, Settings};
use crate::criteria::Criteria;
use crate::errors::{BuildgateError, Result};

impl TryFrom<RawConfigFile> for Settings {
    type Error = BuildgateError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let compiled = validate_raw_config(&raw)?;
        Ok(Settings::new_unchecked(raw.criteria, raw.build, compiled))
    }
}

/// Run every check on a raw config without consuming it.
pub fn validate_config(raw: &RawConfigFile) -> Result<()> {
    validate_raw_config(raw).map(|_| ())
}

/// Returns the compiled criteria so callers never compile twice.
fn validate_raw_config(cfg: &RawConfigFile) -> Result<Criteria> {
    ensure_has_include_dirs(&cfg.criteria)?;
    ensure_no_blank("include_dir", &cfg.criteria.include_dir)?;
    ensure_no_blank("exclude_user", &cfg.criteria.exclude_user)?;
    ensure_no_blank("exclude_msg", &cfg.criteria.exclude_msg)?;
    let compiled = Criteria::from_section(&cfg.criteria)?;
    validate_build_section(&cfg.build)?;
    Ok(compiled)
}

fn ensure_has_include_dirs(criteria: &CriteriaSection) -> Result<()> {
    if criteria.include_dir.is_empty() {
        return Err(BuildgateError::ConfigError(
            "at least one include directory is required (--include-dir or [criteria].include_dir)"
                .to_string(),
        ));
    }
    Ok(())
}

/// A blank pattern would match every author, message or path.
fn ensure_no_blank(field: &str, patterns: &[String]) -> Result<()> {
    if let Some(blank) = patterns.iter().find(|p| p.trim().is_empty()) {
        return Err(BuildgateError::ConfigError(format!(
            "[criteria].{field} entries must not be blank (got {blank:?})"
        )));
    }
    Ok(())
}

fn validate_build_section(build: &BuildSection) -> Result<()> {
    if build.timeout_secs == 0 {
        return Err(BuildgateError::ConfigError(
            "[build].timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    ensure_bare_file_name("record_file", &build.record_file)?;
    ensure_bare_file_name("descriptor", &build.descriptor)?;
    Ok(())
}

fn ensure_bare_file_name(field: &str, name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(BuildgateError::ConfigError(format!(
            "[build].{field} must be a plain file name (got {name:?})"
        ))),
    }
}
