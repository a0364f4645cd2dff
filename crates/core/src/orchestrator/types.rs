//! Types for the download orchestrator.

use thiserror::Error;

/// Errors that can occur when driving an orchestrator.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// `start` was called while the orchestrator is already running.
    #[error("orchestrator already running")]
    AlreadyRunning,

    /// `stop` was called while the orchestrator is not running.
    #[error("orchestrator not running")]
    NotRunning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            OrchestratorError::AlreadyRunning.to_string(),
            "orchestrator already running"
        );
        assert_eq!(
            OrchestratorError::NotRunning.to_string(),
            "orchestrator not running"
        );
    }
}
