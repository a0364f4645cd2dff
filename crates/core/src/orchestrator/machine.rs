//! Download task state machine.
//!
//! Transitions are pure functions of `(state, event)`: every asynchronous
//! completion becomes one [`Event`] fed into [`Machine::handle`], which
//! returns the [`Effect`]s the runner must carry out. This keeps the whole
//! sequencing testable without any transport.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::listing::RemoteItem;
use crate::progress::{ProgressSnapshot, TaskState};
use crate::transport::{DownloadVariant, TransportError};

use super::config::CountPolicy;

/// One input to the state machine.
#[derive(Debug)]
pub(crate) enum Event {
    /// The gate flipped to allowed.
    GateOpened,
    /// The gate flipped to denied.
    GateClosed,
    /// The listing request completed.
    ListingDone(Result<Vec<RemoteItem>, TransportError>),
    /// The current download step completed.
    DownloadDone(Result<(), TransportError>),
    /// The current delete request completed.
    DeleteDone(Result<(), TransportError>),
}

/// One side effect the runner must carry out, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Effect {
    /// Publish a progress snapshot (duplicate suppression is the
    /// publisher's concern).
    Publish(ProgressSnapshot),
    /// Issue the listing request.
    StartListing,
    /// Issue a download request for one rendition of the current item.
    StartDownload {
        url: String,
        destination: PathBuf,
        variant: DownloadVariant,
    },
    /// Issue a delete request for the current item.
    StartDelete { id: String },
    /// Tell storage that a downloaded file is ready.
    NotifyReady { path: PathBuf },
    /// Cancel any in-flight transport request and invalidate pending
    /// completions.
    Dispose,
}

/// The sequential download task state machine.
///
/// Owns the worklist and its cursor exclusively; external observers only
/// ever see published snapshots.
pub(crate) struct Machine {
    policy: CountPolicy,
    state: TaskState,
    worklist: Vec<RemoteItem>,
    current_index: usize,
    step_index: usize,
    item_ok: bool,
    downloaded_count: usize,
}

impl Machine {
    pub(crate) fn new(policy: CountPolicy) -> Self {
        Self {
            policy,
            state: TaskState::Idle,
            worklist: Vec::new(),
            current_index: 0,
            step_index: 0,
            item_ok: true,
            downloaded_count: 0,
        }
    }

    /// Current snapshot of the task.
    pub(crate) fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            state: self.state,
            current_index: self.current_index,
            total_items: self.worklist.len(),
            downloaded_count: self.downloaded_count,
        }
    }

    /// Whether a cycle is currently running.
    pub(crate) fn is_active(&self) -> bool {
        matches!(
            self.state,
            TaskState::Listing | TaskState::DownloadingItem | TaskState::DeletingItem
        )
    }

    /// Applies one event, returning the effects to carry out in order.
    pub(crate) fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::GateOpened => self.on_gate_opened(),
            Event::GateClosed => self.on_gate_closed(),
            Event::ListingDone(result) => self.on_listing_done(result),
            Event::DownloadDone(result) => self.on_download_done(result),
            Event::DeleteDone(result) => self.on_delete_done(result),
        }
    }

    fn on_gate_opened(&mut self) -> Vec<Effect> {
        if self.is_active() {
            debug!(state = ?self.state, "gate opened while a cycle is running, ignoring");
            return Vec::new();
        }

        debug!("gate opened, starting listing cycle");
        self.worklist.clear();
        self.current_index = 0;
        self.step_index = 0;
        self.item_ok = true;
        self.downloaded_count = 0;
        self.state = TaskState::Listing;
        vec![Effect::Publish(self.snapshot()), Effect::StartListing]
    }

    fn on_gate_closed(&mut self) -> Vec<Effect> {
        if !self.is_active() {
            debug!(state = ?self.state, "gate closed while no cycle is running, ignoring");
            return Vec::new();
        }

        info!(
            index = self.current_index,
            downloaded = self.downloaded_count,
            "gate closed, aborting download cycle"
        );
        let mut effects = vec![Effect::Dispose];
        effects.extend(self.interrupt());
        effects
    }

    fn on_listing_done(&mut self, result: Result<Vec<RemoteItem>, TransportError>) -> Vec<Effect> {
        if self.state != TaskState::Listing {
            debug!(state = ?self.state, "unexpected listing completion, ignoring");
            return Vec::new();
        }

        match result {
            Ok(items) if items.is_empty() => {
                info!("no remote items to download");
                self.state = TaskState::Completed;
                vec![Effect::Publish(self.snapshot())]
            }
            Ok(items) => {
                info!(items = items.len(), "listing received, starting downloads");
                self.worklist = items;
                self.current_index = 0;
                self.step_index = 0;
                self.item_ok = true;
                self.state = TaskState::DownloadingItem;
                vec![Effect::Publish(self.snapshot()), self.start_download()]
            }
            Err(err) if err.is_canceled() => {
                debug!("listing canceled");
                self.state = TaskState::Idle;
                vec![Effect::Publish(self.snapshot())]
            }
            Err(err) => {
                // Silent recovery: counts are untouched and no retry is
                // scheduled; the next gate-open lists again.
                warn!(error = %err, "listing failed");
                self.state = TaskState::Idle;
                vec![Effect::Publish(self.snapshot())]
            }
        }
    }

    fn on_download_done(&mut self, result: Result<(), TransportError>) -> Vec<Effect> {
        if self.state != TaskState::DownloadingItem {
            debug!(state = ?self.state, "unexpected download completion, ignoring");
            return Vec::new();
        }

        let mut effects = Vec::new();
        match result {
            Ok(()) => {
                let step = &self.worklist[self.current_index].steps[self.step_index];
                debug!(
                    index = self.current_index,
                    variant = ?step.variant,
                    "download step succeeded"
                );
                effects.push(Effect::NotifyReady {
                    path: step.destination.clone(),
                });
            }
            Err(err) if err.is_canceled() => {
                return self.interrupt();
            }
            Err(err) => {
                // A failed download never blocks the pipeline: deletion is
                // still attempted so the device is not left clogged.
                warn!(
                    index = self.current_index,
                    error = %err,
                    "download step failed"
                );
                self.item_ok = false;
            }
        }

        self.step_index += 1;
        if self.step_index < self.worklist[self.current_index].steps.len() {
            effects.push(self.start_download());
            return effects;
        }

        // All renditions of this item are done; move on to deletion.
        if self.policy == CountPolicy::AfterDownload && self.item_ok {
            self.downloaded_count += 1;
        }
        self.state = TaskState::DeletingItem;
        effects.push(Effect::Publish(self.snapshot()));
        effects.push(Effect::StartDelete {
            id: self.worklist[self.current_index].id.clone(),
        });
        effects
    }

    fn on_delete_done(&mut self, result: Result<(), TransportError>) -> Vec<Effect> {
        if self.state != TaskState::DeletingItem {
            debug!(state = ?self.state, "unexpected delete completion, ignoring");
            return Vec::new();
        }

        match result {
            Ok(()) => {}
            Err(err) if err.is_canceled() => {
                return self.interrupt();
            }
            Err(err) => {
                // A failed delete is logged and otherwise fully ignored.
                warn!(
                    id = %self.worklist[self.current_index].id,
                    error = %err,
                    "failed to delete remote item"
                );
            }
        }

        if self.policy == CountPolicy::AfterDelete && self.item_ok {
            self.downloaded_count += 1;
        }

        self.current_index += 1;
        self.step_index = 0;
        self.item_ok = true;

        if self.current_index == self.worklist.len() {
            info!(downloaded = self.downloaded_count, "download cycle completed");
            self.state = TaskState::Completed;
            vec![Effect::Publish(self.snapshot())]
        } else {
            self.state = TaskState::DownloadingItem;
            vec![Effect::Publish(self.snapshot()), self.start_download()]
        }
    }

    /// Aborts the cycle: publishes the transient `Interrupted` state, then
    /// `Idle`, then discards the worklist.
    fn interrupt(&mut self) -> Vec<Effect> {
        self.state = TaskState::Interrupted;
        let interrupted = self.snapshot();
        self.state = TaskState::Idle;
        let idle = self.snapshot();
        self.worklist.clear();
        vec![Effect::Publish(interrupted), Effect::Publish(idle)]
    }

    fn start_download(&self) -> Effect {
        let item = &self.worklist[self.current_index];
        let step = &item.steps[self.step_index];
        Effect::StartDownload {
            url: item.remote_path.clone(),
            destination: step.destination.clone(),
            variant: step.variant,
        }
    }
}
