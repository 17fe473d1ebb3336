//! Core telemetry traits for event observation.

// Layer 1: Standard library imports
use std::fmt::Debug;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

// Layer 3: Internal module imports
use super::error::TelemetryError;
use super::types::TelemetrySnapshot;

/// Event severity levels for filtering and categorization.
///
/// Ordered from lowest to highest severity so collectors can filter with a
/// simple comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    /// Trace-level events for detailed debugging
    Trace,
    /// Debug-level events for development
    Debug,
    /// Informational events for normal operations
    Info,
    /// Warning events for potential issues
    Warning,
    /// Error events for failures
    Error,
    /// Critical events for system-level failures
    Critical,
}

/// Trait for events a [`Collector`] can observe.
///
/// Implemented by the orchestration event types in this crate; downstream
/// code can define its own event types and reuse the collectors.
pub trait TelemetryEvent: Send + Sync + Clone + Debug + Serialize + 'static {
    /// Static event type identifier for categorization.
    const EVENT_TYPE: &'static str;

    /// Timestamp at which the event occurred.
    fn timestamp(&self) -> DateTime<Utc>;

    /// Severity of the event.
    fn severity(&self) -> Severity;
}

/// Generic collector of telemetry events.
///
/// Implementations range from the zero-overhead [`super::NoopCollector`] to
/// the history-keeping [`super::InMemoryCollector`]. Callers that must not be
/// disturbed by collection failures discard the returned `Result`.
#[async_trait]
pub trait Collector<E: TelemetryEvent>: Send + Sync + Clone {
    /// Record one event.
    ///
    /// # Errors
    /// Returns [`TelemetryError::Record`] when the event cannot be stored.
    async fn record(&self, event: E) -> Result<(), TelemetryError>;

    /// Produce a point-in-time snapshot of counters and recent history.
    ///
    /// # Errors
    /// Returns [`TelemetryError::Snapshot`] when the snapshot cannot be built.
    async fn snapshot(&self) -> Result<TelemetrySnapshot<E>, TelemetryError>;

    /// Clear all counters and history.
    ///
    /// # Errors
    /// Returns [`TelemetryError::Reset`] when the reset fails.
    async fn reset(&self) -> Result<(), TelemetryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Debug);
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&Severity::Warning).expect("Serialization should succeed");
        assert!(json.contains("Warning"));
    }
}
