//! Telemetry error types.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Errors raised by telemetry collectors.
///
/// Orchestration callers treat these as best-effort and discard them; they
/// are surfaced only when a collector is queried directly.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Event could not be recorded
    #[error("failed to record telemetry event: {0}")]
    Record(String),

    /// Snapshot could not be produced
    #[error("failed to build telemetry snapshot: {0}")]
    Snapshot(String),

    /// Collector state could not be reset
    #[error("failed to reset telemetry collector: {0}")]
    Reset(String),
}

impl TelemetryError {
    /// Build a record error from any displayable cause.
    pub fn record(cause: impl Into<String>) -> Self {
        Self::Record(cause.into())
    }

    /// Build a snapshot error from any displayable cause.
    pub fn snapshot(cause: impl Into<String>) -> Self {
        Self::Snapshot(cause.into())
    }

    /// Build a reset error from any displayable cause.
    pub fn reset(cause: impl Into<String>) -> Self {
        Self::Reset(cause.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_display() {
        let err = TelemetryError::record("buffer poisoned");
        assert!(err.to_string().contains("record"));
        assert!(err.to_string().contains("buffer poisoned"));
    }

    #[test]
    fn test_snapshot_display() {
        let err = TelemetryError::snapshot("lock unavailable");
        assert!(err.to_string().contains("snapshot"));
    }

    #[test]
    fn test_reset_display() {
        let err = TelemetryError::reset("lock unavailable");
        assert!(err.to_string().contains("reset"));
    }
}
