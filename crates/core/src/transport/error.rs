//! Error types for the transport module.

use thiserror::Error;

/// Errors that can occur while talking to the device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The device answered with a non-success status code.
    #[error("device answered with status {code}")]
    Status { code: u16 },

    /// The request could not be carried out (connection refused, reset, ...).
    #[error("network error: {reason}")]
    Network { reason: String },

    /// The request timed out at the transport level.
    #[error("request timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// No transport is currently available for the device.
    #[error("transport unavailable")]
    Unavailable,

    /// The request was canceled, either by `dispose` or upstream.
    #[error("request canceled")]
    Canceled,
}

impl TransportError {
    /// Creates a network error from any displayable reason.
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }

    /// Whether this error denotes a cancellation rather than a failure.
    ///
    /// Cancellations abort the whole download task; failures only affect the
    /// current step.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}
