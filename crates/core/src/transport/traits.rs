//! Trait definitions for the transport module.

use async_trait::async_trait;
use std::path::Path;

use super::error::TransportError;
use super::types::{DownloadVariant, RemoteEntry};

/// A transport able to list, download and delete items stored on a device.
///
/// Implementations keep at most one request in flight per orchestrator; the
/// orchestrator never issues a second request before the first completes.
/// `dispose` must make any in-flight request complete with
/// [`TransportError::Canceled`] promptly.
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// Returns the name of this transport implementation.
    fn name(&self) -> &str;

    /// Lists the items currently stored on the device.
    async fn list(&self) -> Result<Vec<RemoteEntry>, TransportError>;

    /// Downloads one rendition of a remote item to `destination`.
    async fn download(
        &self,
        url: &str,
        destination: &Path,
        variant: DownloadVariant,
    ) -> Result<(), TransportError>;

    /// Requests deletion of a remote item by its stable identifier.
    async fn delete(&self, name: &str) -> Result<(), TransportError>;

    /// Forcibly cancels any outstanding request.
    ///
    /// Pending `list`/`download`/`delete` calls resolve with
    /// [`TransportError::Canceled`].
    async fn dispose(&self);
}
