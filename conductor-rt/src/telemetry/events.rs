//! Orchestration event types.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use serde::Serialize;

// Layer 3: Internal module imports
use super::traits::{Severity, TelemetryEvent};
use crate::diagnostic::{FailureContext, Phase};

/// Per-component lifecycle outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentEvent {
    /// Timestamp when the outcome was observed
    pub timestamp: DateTime<Utc>,

    /// Description of the component's token
    pub token: String,

    /// Specific outcome
    pub kind: ComponentEventKind,
}

/// Specific component lifecycle outcomes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ComponentEventKind {
    /// Component started successfully
    Started {
        /// Hook duration in milliseconds
        duration_ms: u64,
    },

    /// Component stopped successfully
    Stopped {
        /// Hook duration in milliseconds
        duration_ms: u64,
    },

    /// Component destroyed successfully
    Destroyed {
        /// Hook duration in milliseconds
        duration_ms: u64,
    },

    /// Component hook failed or timed out
    Failed {
        /// Phase in which the failure occurred
        phase: Phase,
        /// Why the hook ran
        context: FailureContext,
        /// Whether the hook exceeded its deadline
        timed_out: bool,
        /// Hook duration in milliseconds
        duration_ms: u64,
        /// Rendered failure message
        error: String,
    },
}

/// Orchestration progress for one phase traversal.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseEvent {
    /// Timestamp when the event was emitted
    pub timestamp: DateTime<Utc>,

    /// Phase being traversed
    pub phase: Phase,

    /// Specific progress marker
    pub kind: PhaseEventKind,
}

/// Specific phase progress markers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum PhaseEventKind {
    /// Layering was computed; token descriptions per layer, in order
    Planned {
        /// Ordered layers by token description
        layers: Vec<Vec<String>>,
    },

    /// One layer fully settled
    LayerSettled {
        /// Layer index within the traversal
        layer: usize,
        /// Number of components that completed the phase
        succeeded: usize,
        /// Number of components that failed the phase
        failed: usize,
    },
}

/// Union of all events the orchestrator emits.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OrchestrationEvent {
    /// Per-component outcome
    Component(ComponentEvent),
    /// Phase traversal progress
    Phase(PhaseEvent),
}

impl TelemetryEvent for OrchestrationEvent {
    const EVENT_TYPE: &'static str = "orchestration";

    fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Component(e) => e.timestamp,
            Self::Phase(e) => e.timestamp,
        }
    }

    fn severity(&self) -> Severity {
        match self {
            Self::Component(e) => match e.kind {
                ComponentEventKind::Failed { .. } => Severity::Error,
                _ => Severity::Info,
            },
            Self::Phase(_) => Severity::Debug,
        }
    }
}

impl ComponentEvent {
    /// Event for a successful phase outcome.
    pub fn succeeded(token: impl Into<String>, phase: Phase, duration_ms: u64) -> Self {
        let kind = match phase {
            Phase::Start => ComponentEventKind::Started { duration_ms },
            Phase::Stop => ComponentEventKind::Stopped { duration_ms },
            Phase::Destroy => ComponentEventKind::Destroyed { duration_ms },
        };
        Self {
            timestamp: Utc::now(),
            token: token.into(),
            kind,
        }
    }

    /// Event for a failed phase outcome.
    pub fn failed(
        token: impl Into<String>,
        phase: Phase,
        context: FailureContext,
        timed_out: bool,
        duration_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            token: token.into(),
            kind: ComponentEventKind::Failed {
                phase,
                context,
                timed_out,
                duration_ms,
                error: error.into(),
            },
        }
    }
}

impl PhaseEvent {
    /// Event recording the computed layering for a phase traversal.
    pub fn planned(phase: Phase, layers: Vec<Vec<String>>) -> Self {
        Self {
            timestamp: Utc::now(),
            phase,
            kind: PhaseEventKind::Planned { layers },
        }
    }

    /// Event recording one settled layer.
    pub fn layer_settled(phase: Phase, layer: usize, succeeded: usize, failed: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            phase,
            kind: PhaseEventKind::LayerSettled {
                layer,
                succeeded,
                failed,
            },
        }
    }
}
