//! Mock report storage for testing.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::storage::ReportStorage;

/// Mock implementation of the [`ReportStorage`] trait.
///
/// Hands out a fixed work directory and records every readiness
/// notification for assertions.
#[derive(Debug)]
pub struct MockStorage {
    work_dir: PathBuf,
    notified: Mutex<Vec<PathBuf>>,
}

impl MockStorage {
    /// Creates a mock storage rooted at the given work directory.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            notified: Mutex::new(Vec::new()),
        }
    }

    /// Paths passed to `notify_item_ready`, in notification order.
    pub fn notified(&self) -> Vec<PathBuf> {
        self.notified.lock().unwrap().clone()
    }
}

impl ReportStorage for MockStorage {
    fn work_dir(&self) -> PathBuf {
        self.work_dir.clone()
    }

    fn notify_item_ready(&self, path: &Path) {
        self.notified.lock().unwrap().push(path.to_path_buf());
    }
}
