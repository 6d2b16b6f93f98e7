// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildgateError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid {kind} pattern '{pattern}': {source}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Revision metadata error: {0}")]
    Metadata(String),

    #[error("Malformed watermark record {path:?}: {reason}")]
    MalformedWatermark { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BuildgateError>;
