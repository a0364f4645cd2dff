//! Progress publication.
//!
//! The orchestrator exposes its state through a publish/observe contract:
//! each state transition yields exactly one notification, and a no-op
//! transition (e.g. a redundant gate signal) yields none. Duplicate
//! suppression is a diffed-snapshot compare against the last published
//! value.

mod types;

pub use types::{ProgressSnapshot, TaskState};

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::trace;

/// Publisher side of the progress contract.
///
/// Cheaply cloneable. Sequenced notifications go out on a broadcast channel;
/// the latest snapshot is additionally kept in a watch channel for polling.
#[derive(Debug, Clone)]
pub struct ProgressPublisher {
    tx: broadcast::Sender<ProgressSnapshot>,
    current: Arc<watch::Sender<ProgressSnapshot>>,
}

impl ProgressPublisher {
    /// Creates a publisher whose subscribers may lag up to `capacity`
    /// notifications before losing the oldest ones.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        let (current, _) = watch::channel(ProgressSnapshot::default());
        Self {
            tx,
            current: Arc::new(current),
        }
    }

    /// Publishes a snapshot, unless it equals the last published one.
    ///
    /// Returns whether a notification actually went out.
    pub fn publish(&self, snapshot: ProgressSnapshot) -> bool {
        let changed = self.current.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot.clone();
                true
            }
        });

        if changed {
            trace!(state = ?snapshot.state, "publishing progress");
            // A send error only means nobody is subscribed right now.
            let _ = self.tx.send(snapshot);
        }
        changed
    }

    /// Subscribes to the sequence of notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressSnapshot> {
        self.tx.subscribe()
    }

    /// Watches the latest snapshot.
    pub fn watch(&self) -> watch::Receiver<ProgressSnapshot> {
        self.current.subscribe()
    }

    /// Latest published snapshot.
    pub fn current(&self) -> ProgressSnapshot {
        self.current.borrow().clone()
    }
}
