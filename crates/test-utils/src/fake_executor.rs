use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use buildgate::exec::{BuildExecutor, BuildFuture, BuildStatus, DirectoryBuildOutcome};

/// A fake executor that:
/// - records which directories were "built"
/// - answers with a scripted status per directory (success by default).
#[derive(Clone, Default)]
pub struct FakeExecutor {
    scripted: Arc<Mutex<HashMap<String, BuildStatus>>>,
    executed: Arc<Mutex<Vec<String>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the build of `directory` end with `status`.
    pub fn script(self, directory: &str, status: BuildStatus) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .insert(directory.to_string(), status);
        self
    }

    /// Shared handle on the list of directories built so far.
    pub fn executed(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.executed)
    }
}

impl BuildExecutor for FakeExecutor {
    fn build<'a>(&'a self, directory: &'a str, timeout: Duration) -> BuildFuture<'a> {
        let scripted = Arc::clone(&self.scripted);
        let executed = Arc::clone(&self.executed);

        Box::pin(async move {
            executed.lock().unwrap().push(directory.to_string());

            let status = scripted
                .lock()
                .unwrap()
                .get(directory)
                .copied()
                .unwrap_or(BuildStatus::Succeeded);

            let output = vec![format!("fake build of {directory}")];
            let elapsed = Duration::from_millis(10);
            match status {
                BuildStatus::Succeeded => DirectoryBuildOutcome::success(directory, elapsed, output),
                BuildStatus::Failed { exit_code } => {
                    DirectoryBuildOutcome::failure(directory, exit_code, elapsed, output)
                }
                BuildStatus::TimedOut => DirectoryBuildOutcome::timed_out(directory, timeout, output),
                BuildStatus::Skipped => DirectoryBuildOutcome::skipped(directory, "Makefile"),
                BuildStatus::Error => DirectoryBuildOutcome::error(directory, "scripted error"),
            }
        })
    }
}
