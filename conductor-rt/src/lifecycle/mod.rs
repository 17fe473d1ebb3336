//! Lifecycle kernel: per-component state machine with bounded hook
//! execution.
//!
//! A [`LifecycleCell`] drives one component through the four-state machine
//! ([`LifecycleState`]), invoking the component's [`Lifecycle`] hooks under
//! an optional deadline and reporting each phase as a [`PhaseReport`].

pub mod cell;
pub mod hooks;
pub mod phase;
pub mod state;

pub use cell::LifecycleCell;
pub use hooks::Lifecycle;
pub use phase::PhaseReport;
pub use state::LifecycleState;
