//! Local staging storage abstraction.
//!
//! The orchestrator does not decide where downloaded items land; it asks an
//! injected [`ReportStorage`] for the work directory and notifies it when a
//! file is fully downloaded. Path resolution, quota management and any
//! further processing of staged files are the storage's concern.

use std::path::{Path, PathBuf};

/// Destination and completion sink for downloaded items.
pub trait ReportStorage: Send + Sync {
    /// Directory where items are staged while a download cycle runs.
    fn work_dir(&self) -> PathBuf;

    /// Signals that an item finished downloading to `path`.
    ///
    /// Fire-and-forget: no return value, no effect on orchestrator state.
    fn notify_item_ready(&self, path: &Path);
}
