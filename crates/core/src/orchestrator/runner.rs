//! Download orchestrator implementation.
//!
//! Drives the worklist through the item pipeline one entry at a time:
//! - Listing: one outstanding request, gated by the allowance edge
//! - Item pipeline: sequential (download renditions, then delete)
//! - Progress: one publication per state transition
//!
//! A single event-loop task owns the state machine; transport completions
//! come back as epoch-tagged events, and completions from a canceled cycle
//! are dropped before they reach the machine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::gate::GateMonitor;
use crate::listing::{self, ItemKind};
use crate::progress::{ProgressPublisher, ProgressSnapshot};
use crate::storage::ReportStorage;
use crate::transport::DeviceTransport;

use super::config::DownloaderConfig;
use super::machine::{Effect, Event, Machine};
use super::types::OrchestratorError;

/// The download orchestrator: sequences listing, per-item downloads and
/// remote deletion against an injected transport, under an external gate.
pub struct DownloadOrchestrator {
    config: DownloaderConfig,
    kind: ItemKind,
    transport: Arc<dyn DeviceTransport>,
    storage: Arc<dyn ReportStorage>,
    gate: GateMonitor,
    publisher: ProgressPublisher,
    progress_rx: watch::Receiver<ProgressSnapshot>,

    // Runtime state
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl DownloadOrchestrator {
    /// Creates a new orchestrator. No transport request is issued until the
    /// gate first allows it after `start`.
    pub fn new(
        config: DownloaderConfig,
        kind: ItemKind,
        transport: Arc<dyn DeviceTransport>,
        storage: Arc<dyn ReportStorage>,
        gate: GateMonitor,
    ) -> Self {
        let publisher = ProgressPublisher::new(config.channel_capacity.max(1));
        let progress_rx = publisher.watch();
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            kind,
            transport,
            storage,
            gate,
            publisher,
            progress_rx,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            task: Mutex::new(None),
        }
    }

    /// Starts the orchestrator (spawns the event loop task).
    pub async fn start(&self) -> Result<(), OrchestratorError> {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("orchestrator already running");
            return Err(OrchestratorError::AlreadyRunning);
        }

        info!(transport = self.transport.name(), kind = ?self.kind, "starting download orchestrator");

        let driver = Driver::new(
            self.config.clone(),
            self.kind,
            Arc::clone(&self.transport),
            Arc::clone(&self.storage),
            self.publisher.clone(),
        );
        let gate = self.gate.clone();
        let shutdown_rx = self.shutdown_tx.subscribe();

        let handle = tokio::spawn(driver.event_loop(gate, shutdown_rx));
        *self.task.lock().await = Some(handle);

        Ok(())
    }

    /// Stops the orchestrator, aborting any in-flight work.
    ///
    /// If a cycle is running, observers see `Interrupted` then `Idle`
    /// before this returns.
    pub async fn stop(&self) -> Result<(), OrchestratorError> {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("orchestrator not running");
            return Err(OrchestratorError::NotRunning);
        }

        info!("stopping download orchestrator");
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.task.lock().await.take() {
            if let Err(err) = handle.await {
                warn!(error = %err, "orchestrator task ended abnormally");
            }
        }
        info!("download orchestrator stopped");

        Ok(())
    }

    /// Whether the event loop is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Subscribes to the sequence of progress notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressSnapshot> {
        self.publisher.subscribe()
    }

    /// Latest published snapshot.
    pub fn progress(&self) -> ProgressSnapshot {
        self.progress_rx.borrow().clone()
    }
}

/// Owns the machine inside the event loop and executes its effects.
struct Driver {
    machine: Machine,
    kind: ItemKind,
    transport: Arc<dyn DeviceTransport>,
    storage: Arc<dyn ReportStorage>,
    publisher: ProgressPublisher,
    event_tx: mpsc::Sender<(u64, Event)>,
    event_rx: mpsc::Receiver<(u64, Event)>,
    /// Generation of the current cycle. Every issued transport call captures
    /// it; completions carrying an older value are dropped.
    epoch: u64,
}

impl Driver {
    fn new(
        config: DownloaderConfig,
        kind: ItemKind,
        transport: Arc<dyn DeviceTransport>,
        storage: Arc<dyn ReportStorage>,
        publisher: ProgressPublisher,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(config.channel_capacity.max(1));
        Self {
            machine: Machine::new(config.count_policy),
            kind,
            transport,
            storage,
            publisher,
            event_tx,
            event_rx,
            epoch: 0,
        }
    }

    async fn event_loop(mut self, mut gate: GateMonitor, mut shutdown_rx: broadcast::Receiver<()>) {
        debug!("orchestrator event loop started");

        if gate.is_allowed() {
            // A gate that is already open counts as the first open edge.
            self.dispatch(Event::GateOpened).await;
        }

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!("orchestrator received shutdown signal");
                    self.dispatch(Event::GateClosed).await;
                    break;
                }
                edge = gate.changed() => match edge {
                    Some(true) => self.dispatch(Event::GateOpened).await,
                    Some(false) => self.dispatch(Event::GateClosed).await,
                    None => {
                        debug!("gate dropped, tearing down");
                        self.dispatch(Event::GateClosed).await;
                        break;
                    }
                },
                completion = self.event_rx.recv() => {
                    // The loop holds a sender, so the channel never closes
                    // from under us.
                    let Some((epoch, event)) = completion else { break };
                    if epoch != self.epoch {
                        debug!(stale = epoch, current = self.epoch, "dropping stale completion");
                        continue;
                    }
                    self.dispatch(event).await;
                }
            }
        }

        debug!("orchestrator event loop stopped");
    }

    async fn dispatch(&mut self, event: Event) {
        for effect in self.machine.handle(event) {
            self.execute(effect).await;
        }
    }

    async fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::Publish(snapshot) => {
                self.publisher.publish(snapshot);
            }
            Effect::Dispose => {
                // Invalidate pending completions before the transport is
                // asked to cancel, so nothing from the dead cycle can ever
                // reach the machine.
                self.epoch = self.epoch.wrapping_add(1);
                self.transport.dispose().await;
            }
            Effect::StartListing => {
                self.epoch = self.epoch.wrapping_add(1);
                let epoch = self.epoch;
                let transport = Arc::clone(&self.transport);
                let kind = self.kind;
                let work_dir = self.storage.work_dir();
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = transport
                        .list()
                        .await
                        .map(|entries| listing::normalize(entries, kind, &work_dir));
                    let _ = tx.send((epoch, Event::ListingDone(result))).await;
                });
            }
            Effect::StartDownload {
                url,
                destination,
                variant,
            } => {
                let epoch = self.epoch;
                let transport = Arc::clone(&self.transport);
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = transport.download(&url, &destination, variant).await;
                    let _ = tx.send((epoch, Event::DownloadDone(result))).await;
                });
            }
            Effect::StartDelete { id } => {
                let epoch = self.epoch;
                let transport = Arc::clone(&self.transport);
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = transport.delete(&id).await;
                    let _ = tx.send((epoch, Event::DeleteDone(result))).await;
                });
            }
            Effect::NotifyReady { path } => {
                self.storage.notify_item_ready(&path);
            }
        }
    }
}
