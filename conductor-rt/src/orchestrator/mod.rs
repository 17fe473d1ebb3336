//! The orchestrator: graph registration, layered phase traversals, rollback,
//! and error aggregation.

pub mod config;
pub mod core;
pub mod types;

pub use self::config::{OrchestratorConfig, OrchestratorConfigBuilder, Timeouts};
pub use self::core::Orchestrator;
pub use self::types::NodeSpec;
