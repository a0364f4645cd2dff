//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external trait seams,
//! allowing the whole orchestrator to be exercised without a device.
//!
//! # Example
//!
//! ```rust,ignore
//! use skysync_core::testing::{MockStorage, MockTransport};
//!
//! let transport = MockTransport::new();
//! transport.set_list_result(Ok(vec![/* entries */])).await;
//! transport.hold_downloads();
//!
//! // Use as Arc<dyn DeviceTransport> / Arc<dyn ReportStorage>...
//! ```

mod mock_storage;
mod mock_transport;

pub use mock_storage::MockStorage;
pub use mock_transport::{MockTransport, RecordedCall};
