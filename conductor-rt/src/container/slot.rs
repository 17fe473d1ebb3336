//! Internal storage types for the container maps.

// Layer 1: Standard library imports
use std::any::Any;
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::core::Container;
use crate::diagnostic::OrchestratorError;
use crate::lifecycle::LifecycleCell;

/// Type-erased singleton value.
pub(crate) type AnyValue = Arc<dyn Any + Send + Sync>;

/// Type-erased constructor stored per registered token.
pub(crate) type Constructor =
    Arc<dyn Fn(&Container) -> Result<MaterializedValue, OrchestratorError> + Send + Sync>;

/// One registered provider, awaiting materialization.
pub(crate) struct ProviderSlot {
    pub description: Arc<str>,
    pub construct: Constructor,
}

/// One constructed singleton, with its kernel cell when the component is
/// lifecycle-managed.
#[derive(Clone)]
pub(crate) struct MaterializedValue {
    pub value: AnyValue,
    pub cell: Option<Arc<LifecycleCell>>,
}
