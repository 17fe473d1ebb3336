//! Diagnostic substrate: canonical error codes, typed errors, and
//! structured failure aggregation.
//!
//! Every failure raised by this crate carries a stable `ORK`-prefixed code
//! from [`ErrorCode`]. Multi-component failures are reported as a single
//! aggregate [`OrchestratorError`] holding one [`FailureDetail`] per affected
//! component. The [`emit`] submodule routes code-keyed messages through
//! `tracing` and never lets a logging failure propagate back to callers.

pub mod code;
pub mod detail;
pub mod emit;
pub mod error;

pub use code::{ErrorCode, MessageSpec};
pub use detail::{FailureContext, FailureDetail, Phase};
pub use error::{BoxError, ErrorContext, OrchestratorError};
