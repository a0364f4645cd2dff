//! Progress snapshot types.

use serde::{Deserialize, Serialize};

/// State of the download task.
///
/// Exactly one state is active at a time. `Interrupted` is transient: it is
/// published once when a cycle is aborted and is immediately followed by
/// `Idle`; it is never a resting state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// No cycle running; the gate is closed or the last cycle is over.
    #[default]
    Idle,
    /// Asking the device for the list of remote items.
    Listing,
    /// Downloading the renditions of the current item.
    DownloadingItem,
    /// Deleting the current item from the device.
    DeletingItem,
    /// The cycle was aborted; immediately followed by `Idle`.
    Interrupted,
    /// Every item of the worklist went through its full pipeline.
    Completed,
}

/// Published view of the download task.
///
/// One snapshot is published per state transition; identical consecutive
/// snapshots are suppressed by the publisher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Current task state.
    pub state: TaskState,
    /// Index of the item currently being processed.
    pub current_index: usize,
    /// Number of items in the current worklist.
    pub total_items: usize,
    /// Items whose pipeline fully succeeded so far this cycle.
    pub downloaded_count: usize,
}
