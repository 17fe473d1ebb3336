//! Queue error types.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::diagnostic::{ErrorCode, OrchestratorError};

/// Errors raised by the bounded job queue.
///
/// The first failing job aborts scheduling; in-flight jobs are cancelled by
/// dropping their futures.
#[derive(Error, Debug)]
pub enum QueueError {
    /// A single job exceeded the per-task timeout
    #[error("job {index} exceeded its {timeout:?} timeout")]
    TaskTimeout {
        /// Input index of the job
        index: usize,
        /// Configured per-task timeout
        timeout: Duration,
    },

    /// The whole batch exceeded the shared deadline
    #[error("job batch exceeded its {deadline:?} deadline")]
    DeadlineExceeded {
        /// Configured shared deadline
        deadline: Duration,
    },

    /// Queue bookkeeping invariant violated
    #[error("queue invariant violated: {0}")]
    Internal(String),
}

impl From<QueueError> for OrchestratorError {
    fn from(err: QueueError) -> Self {
        OrchestratorError::with_message(ErrorCode::Internal, err.to_string())
    }
}
