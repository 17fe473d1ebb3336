//! Telemetry configuration and snapshot structures.

// Layer 1: Standard library imports
use std::collections::BTreeMap;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use serde::Serialize;

// Layer 3: Internal module imports
use super::traits::{Severity, TelemetryEvent};

/// Default bounded history size for in-memory collection.
pub const DEFAULT_MAX_HISTORY: usize = 1024;

/// Configuration for telemetry collection behavior.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryConfig {
    /// Whether collection is enabled at all
    pub enabled: bool,

    /// Maximum number of events retained in history
    pub max_history: usize,

    /// Minimum severity recorded; events below this are dropped
    pub severity_filter: Severity,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_history: DEFAULT_MAX_HISTORY,
            severity_filter: Severity::Debug,
        }
    }
}

/// Point-in-time view of a collector's counters and recent events.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySnapshot<E: TelemetryEvent> {
    /// Timestamp when the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Total number of events recorded since the last reset
    pub total_events: u64,

    /// Per-severity event counts
    pub by_severity: BTreeMap<Severity, u64>,

    /// Most recent events, oldest first (bounded by `max_history`)
    pub recent_events: Vec<E>,
}

impl<E: TelemetryEvent> TelemetrySnapshot<E> {
    /// Count of recorded events at the given severity.
    pub fn count(&self, severity: Severity) -> u64 {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }
}
