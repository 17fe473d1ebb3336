//! Per-component failure records used to compose aggregate errors.

// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::Serialize;

// Layer 3: Internal module imports
use super::error::OrchestratorError;

/// Lifecycle phase a failure record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Bringing a component up (`on_create` + `on_start`)
    Start,
    /// Taking a started component down
    Stop,
    /// Final teardown of a component
    Destroy,
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Stop => f.write_str("stop"),
            Self::Destroy => f.write_str("destroy"),
        }
    }
}

/// Reason the failing hook was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureContext {
    /// Regular phase traversal
    Normal,
    /// Compensating stop after a partial start failure
    Rollback,
    /// Container-driven teardown
    Container,
}

impl Display for FailureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Rollback => f.write_str("rollback"),
            Self::Container => f.write_str("container"),
        }
    }
}

/// One component's failure within an aggregate error.
///
/// The parallel `errors` view of an aggregate is derived from these records,
/// so the i-th cause always belongs to the i-th detail.
#[derive(Debug)]
pub struct FailureDetail {
    /// Description of the affected token (or `"container"`)
    pub token: String,
    /// Phase in which the failure occurred
    pub phase: Phase,
    /// Why the hook ran
    pub context: FailureContext,
    /// Whether the hook exceeded its deadline
    pub timed_out: bool,
    /// Measured duration of the failing invocation
    pub duration: Duration,
    /// The underlying failure
    pub error: OrchestratorError,
}

impl FailureDetail {
    /// Build a detail record for one component failure.
    pub fn new(
        token: impl Into<String>,
        phase: Phase,
        context: FailureContext,
        timed_out: bool,
        duration: Duration,
        error: OrchestratorError,
    ) -> Self {
        Self {
            token: token.into(),
            phase,
            context,
            timed_out,
            duration,
            error,
        }
    }

    /// Duration as whole milliseconds, as reported in aggregates.
    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Bare errors fold into details with neutral defaults.
impl From<OrchestratorError> for FailureDetail {
    fn from(error: OrchestratorError) -> Self {
        Self {
            token: String::new(),
            phase: Phase::Start,
            context: FailureContext::Normal,
            timed_out: false,
            duration: Duration::ZERO,
            error,
        }
    }
}
