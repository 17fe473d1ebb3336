//! Convenience re-exports for the common working set.
//!
//! ```rust
//! use conductor_rt::prelude::*;
//! ```

pub use crate::container::Container;
pub use crate::diagnostic::{
    BoxError, ErrorCode, ErrorContext, FailureContext, FailureDetail, OrchestratorError, Phase,
};
pub use crate::lifecycle::{Lifecycle, LifecycleState, PhaseReport};
pub use crate::orchestrator::{NodeSpec, Orchestrator, OrchestratorConfig, Timeouts};
pub use crate::provider::Provider;
pub use crate::registry::Registry;
pub use crate::telemetry::{
    Collector, InMemoryCollector, NoopCollector, OrchestrationEvent, Severity, TelemetryConfig,
};
pub use crate::token::{Token, TokenId};
