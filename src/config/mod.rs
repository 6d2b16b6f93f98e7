// src/config/mod.rs

//! Configuration loading and validation for buildgate.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file and merge command-line flags (`loader.rs`).
//! - Validate it into checked [`Settings`] (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_settings, merge_cli};
pub use model::{BuildSection, CriteriaSection, RawConfigFile, Settings};
pub use validate::validate_config;
