//! Bounded concurrent execution of job batches.
//!
//! Each orchestration layer runs its jobs through [`run`], which bounds
//! concurrency, preserves input order in the results, and supports an
//! optional per-task timeout plus a shared deadline.

pub mod error;
pub mod run;

pub use error::QueueError;
pub use run::{run, Job, RunOptions};
