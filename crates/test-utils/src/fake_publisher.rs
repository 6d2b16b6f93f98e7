use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use buildgate::errors::BuildgateError;
use buildgate::publish::{PublishFuture, WatermarkPublisher};

/// One recorded publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub directory: String,
    pub record: PathBuf,
    pub message: String,
}

/// A publisher that records calls instead of running git.
#[derive(Clone, Default)]
pub struct FakePublisher {
    calls: Arc<Mutex<Vec<Published>>>,
    fail: bool,
}

impl FakePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every publish call returns an error (after being recorded).
    pub fn failing() -> Self {
        Self {
            calls: Arc::default(),
            fail: true,
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<Published>>> {
        Arc::clone(&self.calls)
    }
}

impl WatermarkPublisher for FakePublisher {
    fn publish<'a>(&'a self, directory: &'a str, record: &'a Path, message: &'a str) -> PublishFuture<'a> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(Published {
                directory: directory.to_string(),
                record: record.to_path_buf(),
                message: message.to_string(),
            });
            if self.fail {
                return Err(BuildgateError::Other(anyhow::anyhow!("scripted commit failure")));
            }
            Ok::<(), BuildgateError>(())
        })
    }
}
