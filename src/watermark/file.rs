// src/watermark/file.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use super::record::{parse_record, render_record};
use super::WatermarkStore;
use crate::errors::{BuildgateError, Result};
use crate::fs::FileSystem;
use crate::revision::Timestamp;

/// Stores each directory's watermark in `<root>/<directory>/<record_file>`.
///
/// Writes go to a hidden sibling temp file which is then renamed over the
/// record, so readers only ever see the old or the new content.
#[derive(Debug, Clone)]
pub struct FileWatermarkStore {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    record_file: String,
}

impl FileWatermarkStore {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>, record_file: impl Into<String>) -> Self {
        Self {
            fs,
            root: root.into(),
            record_file: record_file.into(),
        }
    }

    pub fn record_path(&self, directory: &str) -> PathBuf {
        self.root.join(directory).join(&self.record_file)
    }

    fn temp_path(&self, record: &Path) -> PathBuf {
        let name = format!(".{}.tmp-{}", self.record_file, std::process::id());
        match record.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }
}

impl WatermarkStore for FileWatermarkStore {
    fn read(&self, directory: &str) -> Result<Option<Timestamp>> {
        let path = self.record_path(directory);

        if !self.fs.is_file(&path) {
            debug!(directory = %directory, path = ?path, "no watermark record");
            return Ok(None);
        }

        let text = self.fs.read_to_string(&path)?;
        let ts = parse_record(&text)
            .map_err(|reason| BuildgateError::MalformedWatermark { path, reason })?;
        Ok(Some(ts))
    }

    fn write(&mut self, directory: &str, timestamp: Timestamp) -> Result<()> {
        let path = self.record_path(directory);

        // Keep whatever else the record holds.
        let existing = if self.fs.is_file(&path) {
            match self.fs.read_to_string(&path) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!(path = ?path, error = %e, "unreadable watermark record; rewriting from scratch");
                    None
                }
            }
        } else {
            None
        };

        let contents = render_record(existing.as_deref(), timestamp);
        let tmp = self.temp_path(&path);

        self.fs
            .write(&tmp, contents.as_bytes())
            .with_context(|| format!("writing temporary watermark {:?}", tmp))?;

        if let Err(e) = self.fs.rename(&tmp, &path) {
            if let Err(cleanup) = self.fs.remove_file(&tmp) {
                debug!(path = ?tmp, error = %cleanup, "could not remove temporary watermark");
            }
            return Err(e
                .context(format!("replacing watermark record {:?}", path))
                .into());
        }

        info!(directory = %directory, timestamp, path = ?path, "stored watermark (file)");
        Ok(())
    }

    fn location(&self, directory: &str) -> Option<PathBuf> {
        Some(self.record_path(directory))
    }
}
