// src/watermark/mod.rs

//! Per-directory "last successful build" watermarks.
//!
//! - [`record`] owns the on-disk text format.
//! - [`file`] stores one record file inside each included directory.
//! - [`MemoryWatermarkStore`] keeps everything in memory (tests, dry runs).

pub mod file;
pub mod record;

pub use file::FileWatermarkStore;
pub use record::{parse_record, render_record, WATERMARK_KEY};

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::info;

use crate::errors::Result;
use crate::revision::Timestamp;

/// Abstract storage for per-directory watermarks.
pub trait WatermarkStore: Send + Sync {
    /// Last successful build timestamp for `directory`.
    ///
    /// `Ok(None)` means no record exists. A record that exists but cannot be
    /// parsed is an error; callers decide how to degrade.
    fn read(&self, directory: &str) -> Result<Option<Timestamp>>;

    /// Create or replace the record for `directory`.
    ///
    /// Implementations must never leave a partially written record behind.
    fn write(&mut self, directory: &str, timestamp: Timestamp) -> Result<()>;

    /// Where the record for `directory` lives, if it is a file.
    fn location(&self, _directory: &str) -> Option<PathBuf> {
        None
    }
}

/// Stores watermarks in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryWatermarkStore {
    map: HashMap<String, Timestamp>,
}

impl MemoryWatermarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a watermark, e.g. to simulate an earlier successful build.
    pub fn with(mut self, directory: &str, timestamp: Timestamp) -> Self {
        self.map.insert(directory.to_string(), timestamp);
        self
    }

    pub fn get(&self, directory: &str) -> Option<Timestamp> {
        self.map.get(directory).copied()
    }
}

impl WatermarkStore for MemoryWatermarkStore {
    fn read(&self, directory: &str) -> Result<Option<Timestamp>> {
        Ok(self.get(directory))
    }

    fn write(&mut self, directory: &str, timestamp: Timestamp) -> Result<()> {
        self.map.insert(directory.to_string(), timestamp);
        info!(directory = %directory, timestamp, "stored watermark (memory)");
        Ok(())
    }
}
