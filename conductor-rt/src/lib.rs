//! # conductor-rt - Component Lifecycle Orchestration Runtime
//!
//! Dependency-injected component orchestration: declare a graph of named
//! components, bring it up in topological order, tear it down in reverse,
//! and get structured aggregates with stable `ORK` codes when anything
//! fails.
//!
//! # Quick Start
//!
//! ```rust
//! use conductor_rt::prelude::*;
//! use async_trait::async_trait;
//!
//! // 1. Define your components
//! struct Database;
//! struct Api;
//!
//! #[async_trait]
//! impl Lifecycle for Database {
//!     async fn on_start(&self) -> Result<(), BoxError> {
//!         // open pools, warm caches...
//!         Ok(())
//!     }
//! }
//!
//! #[async_trait]
//! impl Lifecycle for Api {}
//!
//! // 2. Declare the graph and drive it
//! #[tokio::main]
//! async fn main() -> Result<(), OrchestratorError> {
//!     let orchestrator = Orchestrator::new(OrchestratorConfig::default());
//!
//!     let database = Token::<Database>::new("database");
//!     let api = Token::<Api>::new("api");
//!
//!     orchestrator.register(&database, NodeSpec::new(Provider::factory(|| Database)))?;
//!     orchestrator.register(
//!         &api,
//!         NodeSpec::new(Provider::factory(|| Api)).depends_on(&database),
//!     )?;
//!
//!     orchestrator.start().await?;   // database, then api
//!     orchestrator.destroy().await   // api, then database
//! }
//! ```
//!
//! # Core Guarantees
//!
//! ## Deterministic Layering
//! - **Kahn's algorithm** over the declared graph; layer *i* depends only on
//!   layers `0..i`
//! - **Insertion-order determinism** within each layer
//! - **ORK1008 / ORK1009** for unknown dependencies and cycles, before any
//!   hook runs
//!
//! ## Bounded Hook Execution
//! - Every hook races an effective deadline (`per-node`, else orchestrator
//!   default; zero disables)
//! - Expired hooks are **detached** — late completions and failures are
//!   swallowed, never leaked
//! - Durations come from a **monotonic clock**
//!
//! ## Structured Failure
//! - One [`diagnostic::OrchestratorError`] type with a stable
//!   [`diagnostic::ErrorCode`] per failure
//! - Aggregates carry one [`diagnostic::FailureDetail`] per affected
//!   component, causes parallel to details
//! - Partial start failures **roll back** every started component before
//!   raising ORK1013
//!
//! # Module Organization
//!
//! ## Core
//! - [`token`] - Typed component identities
//! - [`provider`] - Construction recipes (value / factory / injected factory)
//! - [`container`] - Hierarchical DI container with owned singletons
//! - [`lifecycle`] - Four-state kernel with deadline-bounded hooks
//! - [`orchestrator`] - Layered start/stop/destroy with rollback
//!
//! ## Infrastructure
//! - [`graph`] - Deterministic topological layering
//! - [`queue`] - Bounded concurrent job batches, input-order results
//! - [`diagnostic`] - Stable error codes, aggregation, `tracing` emission
//! - [`telemetry`] - Orchestration event collection
//! - [`registry`] - Named-instance storage with lockable entries
//! - [`util`] - Serialization helpers

pub mod container;
pub mod diagnostic;
pub mod graph;
pub mod lifecycle;
pub mod orchestrator;
pub mod prelude;
pub mod provider;
pub mod queue;
pub mod registry;
pub mod telemetry;
pub mod token;
pub mod util;

// Re-export commonly used types
pub use container::Container;
pub use diagnostic::{
    BoxError, ErrorCode, ErrorContext, FailureContext, FailureDetail, OrchestratorError, Phase,
};
pub use lifecycle::{Lifecycle, LifecycleState, PhaseReport};
pub use orchestrator::{NodeSpec, Orchestrator, OrchestratorConfig, Timeouts};
pub use provider::Provider;
pub use registry::Registry;
pub use telemetry::{
    Collector, ComponentEvent, ComponentEventKind, InMemoryCollector, NoopCollector,
    OrchestrationEvent, PhaseEvent, PhaseEventKind, Severity, TelemetryConfig, TelemetryError,
    TelemetryEvent, TelemetrySnapshot,
};
pub use token::{Token, TokenId};
