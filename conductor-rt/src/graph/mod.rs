//! Dependency graph layering.
//!
//! Translates a set of `(token, dependencies)` nodes into a deterministic
//! ordered partition: layer *i* may depend only on layers `0..i`. Teardown
//! traversals reuse the forward layering through [`Layers::group`].

pub mod layering;
pub mod node;

pub use layering::Layers;
pub use node::{DepRef, GraphNode};
