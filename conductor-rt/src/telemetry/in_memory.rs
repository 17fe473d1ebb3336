//! In-memory collector with atomic counters and bounded history.

// Layer 1: Standard library imports
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

// Layer 3: Internal module imports
use super::error::TelemetryError;
use super::traits::{Collector, Severity, TelemetryEvent};
use super::types::{TelemetryConfig, TelemetrySnapshot};

const SEVERITIES: [Severity; 6] = [
    Severity::Trace,
    Severity::Debug,
    Severity::Info,
    Severity::Warning,
    Severity::Error,
    Severity::Critical,
];

/// Collector keeping counters and a bounded ring of recent events in memory.
///
/// Clones share state through an inner `Arc`, so one collector can be handed
/// to the orchestrator while a test or dashboard keeps another handle for
/// snapshots.
#[derive(Debug)]
pub struct InMemoryCollector<E: TelemetryEvent> {
    inner: Arc<CollectorInner<E>>,
}

#[derive(Debug)]
struct CollectorInner<E: TelemetryEvent> {
    config: TelemetryConfig,
    total_events: AtomicU64,
    severity_counts: [AtomicU64; 6],
    history: RwLock<VecDeque<E>>,
}

impl<E: TelemetryEvent> InMemoryCollector<E> {
    /// Create a collector with the given configuration.
    pub fn new(config: TelemetryConfig) -> Self {
        Self {
            inner: Arc::new(CollectorInner {
                config,
                total_events: AtomicU64::new(0),
                severity_counts: [
                    AtomicU64::new(0),
                    AtomicU64::new(0),
                    AtomicU64::new(0),
                    AtomicU64::new(0),
                    AtomicU64::new(0),
                    AtomicU64::new(0),
                ],
                history: RwLock::new(VecDeque::new()),
            }),
        }
    }

    fn severity_slot(severity: Severity) -> usize {
        SEVERITIES
            .iter()
            .position(|s| *s == severity)
            .unwrap_or(SEVERITIES.len() - 1)
    }
}

impl<E: TelemetryEvent> Default for InMemoryCollector<E> {
    fn default() -> Self {
        Self::new(TelemetryConfig::default())
    }
}

impl<E: TelemetryEvent> Clone for InMemoryCollector<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl<E: TelemetryEvent> Collector<E> for InMemoryCollector<E> {
    async fn record(&self, event: E) -> Result<(), TelemetryError> {
        if !self.inner.config.enabled {
            return Ok(());
        }

        let severity = event.severity();
        if severity < self.inner.config.severity_filter {
            return Ok(());
        }

        self.inner.total_events.fetch_add(1, Ordering::Relaxed);
        self.inner.severity_counts[Self::severity_slot(severity)].fetch_add(1, Ordering::Relaxed);

        let mut history = self.inner.history.write();
        if history.len() >= self.inner.config.max_history {
            history.pop_front();
        }
        history.push_back(event);

        Ok(())
    }

    async fn snapshot(&self) -> Result<TelemetrySnapshot<E>, TelemetryError> {
        let mut by_severity = BTreeMap::new();
        for (slot, severity) in SEVERITIES.iter().enumerate() {
            let count = self.inner.severity_counts[slot].load(Ordering::Relaxed);
            if count > 0 {
                by_severity.insert(*severity, count);
            }
        }

        let recent_events = self.inner.history.read().iter().cloned().collect();

        Ok(TelemetrySnapshot {
            timestamp: Utc::now(),
            total_events: self.inner.total_events.load(Ordering::Relaxed),
            by_severity,
            recent_events,
        })
    }

    async fn reset(&self) -> Result<(), TelemetryError> {
        self.inner.total_events.store(0, Ordering::Relaxed);
        for counter in &self.inner.severity_counts {
            counter.store(0, Ordering::Relaxed);
        }
        self.inner.history.write().clear();
        Ok(())
    }
}
