//! Mock device transport for testing.

use std::path::{Path, PathBuf};
use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Notify, RwLock};

use crate::transport::{DeviceTransport, DownloadVariant, RemoteEntry, TransportError};

/// A recorded transport call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// `list` was invoked.
    List,
    /// `download` was invoked with these arguments.
    Download {
        url: String,
        destination: PathBuf,
        variant: DownloadVariant,
    },
    /// `delete` was invoked for this item.
    Delete { id: String },
}

/// Mock implementation of the [`DeviceTransport`] trait.
///
/// Provides controllable behavior for testing:
/// - Record every call for assertions
/// - Script the result of each request kind
/// - Hold downloads in flight until `dispose` cancels them
#[derive(Debug)]
pub struct MockTransport {
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    list_result: Arc<RwLock<Result<Vec<RemoteEntry>, TransportError>>>,
    download_result: Arc<RwLock<Result<(), TransportError>>>,
    delete_result: Arc<RwLock<Result<(), TransportError>>>,
    hold_downloads: AtomicBool,
    download_in_flight: AtomicBool,
    disposed: AtomicBool,
    dispose_notify: Notify,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Creates a mock transport where every request succeeds and the
    /// listing is empty.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(RwLock::new(Vec::new())),
            list_result: Arc::new(RwLock::new(Ok(Vec::new()))),
            download_result: Arc::new(RwLock::new(Ok(()))),
            delete_result: Arc::new(RwLock::new(Ok(()))),
            hold_downloads: AtomicBool::new(false),
            download_in_flight: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
            dispose_notify: Notify::new(),
        }
    }

    /// All recorded calls, in issue order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Scripts the result of subsequent `list` calls.
    pub async fn set_list_result(&self, result: Result<Vec<RemoteEntry>, TransportError>) {
        *self.list_result.write().await = result;
    }

    /// Scripts the result of subsequent `download` calls.
    pub async fn set_download_result(&self, result: Result<(), TransportError>) {
        *self.download_result.write().await = result;
    }

    /// Scripts the result of subsequent `delete` calls.
    pub async fn set_delete_result(&self, result: Result<(), TransportError>) {
        *self.delete_result.write().await = result;
    }

    /// Makes subsequent downloads block until `dispose` cancels them,
    /// simulating a request caught in flight.
    pub fn hold_downloads(&self) {
        self.hold_downloads.store(true, Ordering::SeqCst);
    }

    /// Whether a held download is currently blocked in flight.
    pub fn download_in_flight(&self) -> bool {
        self.download_in_flight.load(Ordering::SeqCst)
    }

    /// Whether `dispose` has been invoked.
    pub fn disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list(&self) -> Result<Vec<RemoteEntry>, TransportError> {
        self.calls.write().await.push(RecordedCall::List);
        if self.disposed.load(Ordering::SeqCst) {
            return Err(TransportError::Canceled);
        }
        self.list_result.read().await.clone()
    }

    async fn download(
        &self,
        url: &str,
        destination: &Path,
        variant: DownloadVariant,
    ) -> Result<(), TransportError> {
        self.calls.write().await.push(RecordedCall::Download {
            url: url.to_string(),
            destination: destination.to_path_buf(),
            variant,
        });

        if self.hold_downloads.load(Ordering::SeqCst) {
            // Register on the notify before checking the flag, so a dispose
            // racing this call cannot be missed.
            let mut notified = pin!(self.dispose_notify.notified());
            notified.as_mut().enable();
            if !self.disposed.load(Ordering::SeqCst) {
                self.download_in_flight.store(true, Ordering::SeqCst);
                notified.await;
                self.download_in_flight.store(false, Ordering::SeqCst);
            }
            return Err(TransportError::Canceled);
        }

        if self.disposed.load(Ordering::SeqCst) {
            return Err(TransportError::Canceled);
        }
        self.download_result.read().await.clone()
    }

    async fn delete(&self, id: &str) -> Result<(), TransportError> {
        self.calls
            .write()
            .await
            .push(RecordedCall::Delete { id: id.to_string() });
        if self.disposed.load(Ordering::SeqCst) {
            return Err(TransportError::Canceled);
        }
        self.delete_result.read().await.clone()
    }

    async fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        self.dispose_notify.notify_waiters();
    }
}
