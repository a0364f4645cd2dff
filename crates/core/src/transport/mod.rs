//! Device transport abstraction.
//!
//! This module provides a `DeviceTransport` trait for talking to a connected
//! device's remote storage across various backends (HTTP, FTP, etc.). The
//! orchestrator only ever sees this seam; wire protocol, TLS and socket-level
//! retries live entirely behind it.

mod error;
mod traits;
mod types;

pub use error::TransportError;
pub use traits::DeviceTransport;
pub use types::{DownloadVariant, RemoteEntry};
