//! Sequential remote-resource download orchestrator.
//!
//! Drives one download cycle at a time through the item pipeline:
//! - **Listing**: one outstanding request, started on a gate-open edge
//! - **Item pipeline**: sequential per item (download renditions, delete)
//! - **Abort**: a gate-close edge cancels the in-flight request and resets
//!   the task, publishing `Interrupted` then `Idle`

mod config;
mod machine;
mod runner;
mod types;

pub use config::{CountPolicy, DownloaderConfig};
pub use runner::DownloadOrchestrator;
pub use types::OrchestratorError;
