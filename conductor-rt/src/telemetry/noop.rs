//! Zero-overhead collector that discards every event.

// Layer 1: Standard library imports
use std::marker::PhantomData;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use chrono::Utc;

// Layer 3: Internal module imports
use super::error::TelemetryError;
use super::traits::{Collector, TelemetryEvent};
use super::types::TelemetrySnapshot;

/// Collector that records nothing and always reports an empty snapshot.
///
/// The default collector for orchestrators that have no observability
/// wiring; every operation is a no-op.
#[derive(Debug)]
pub struct NoopCollector<E: TelemetryEvent> {
    _marker: PhantomData<fn() -> E>,
}

impl<E: TelemetryEvent> NoopCollector<E> {
    /// Create a no-op collector.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E: TelemetryEvent> Default for NoopCollector<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TelemetryEvent> Clone for NoopCollector<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: TelemetryEvent> Collector<E> for NoopCollector<E> {
    async fn record(&self, _event: E) -> Result<(), TelemetryError> {
        Ok(())
    }

    async fn snapshot(&self) -> Result<TelemetrySnapshot<E>, TelemetryError> {
        Ok(TelemetrySnapshot {
            timestamp: Utc::now(),
            total_events: 0,
            by_severity: Default::default(),
            recent_events: Vec::new(),
        })
    }

    async fn reset(&self) -> Result<(), TelemetryError> {
        Ok(())
    }
}
