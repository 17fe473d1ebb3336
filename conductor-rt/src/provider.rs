//! Provider shapes: recipes for constructing a component's value.
//!
//! Construction is strictly synchronous — a provider closure returns the
//! value directly, never a pending computation, so the asynchronous-provider
//! failure modes of dynamic platforms cannot be expressed here. Injection is
//! declared by resolving dependency tokens from the container handed to
//! [`Provider::factory_with`].

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;

// Layer 3: Internal module imports
use crate::container::Container;
use crate::diagnostic::{ErrorCode, OrchestratorError};

/// Recipe for constructing one component.
///
/// Three shapes are supported:
/// - [`Provider::value`] — a pre-constructed value, handed over as-is.
/// - [`Provider::factory`] — a zero-argument constructor.
/// - [`Provider::factory_with`] — a constructor receiving the owning
///   container, used to resolve declared dependencies before building.
///
/// A bare value converts into a provider via `From`, so `container.register(
/// &token, 42)` is shorthand for `container.register(&token,
/// Provider::value(42))`.
///
/// # Examples
///
/// ```rust
/// use conductor_rt::provider::Provider;
///
/// struct Config { port: u16 }
/// struct Server { port: u16 }
///
/// let config = Provider::value(Config { port: 8080 });
/// let fresh = Provider::factory(|| Server { port: 0 });
/// ```
pub struct Provider<T> {
    kind: ProviderKind<T>,
}

enum ProviderKind<T> {
    /// Pre-constructed value, consumed on the single materialization.
    Value(Mutex<Option<T>>),
    Factory(Box<dyn Fn() -> T + Send + Sync>),
    FactoryWith(Box<dyn Fn(&Container) -> Result<T, OrchestratorError> + Send + Sync>),
}

impl<T: Send + Sync + 'static> Provider<T> {
    /// Provider handing over a pre-constructed value.
    pub fn value(value: T) -> Self {
        Self {
            kind: ProviderKind::Value(Mutex::new(Some(value))),
        }
    }

    /// Provider invoking a zero-argument synchronous constructor.
    pub fn factory(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            kind: ProviderKind::Factory(Box::new(factory)),
        }
    }

    /// Provider invoking a constructor that resolves its dependencies from
    /// the owning container.
    ///
    /// The container passed to the closure is the one the provider was
    /// registered on; resolution climbs its parent chain as usual.
    pub fn factory_with(
        factory: impl Fn(&Container) -> Result<T, OrchestratorError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: ProviderKind::FactoryWith(Box::new(factory)),
        }
    }

    /// Construct the value. Called exactly once per (container, token) pair.
    pub(crate) fn materialize(&self, container: &Container) -> Result<T, OrchestratorError> {
        match &self.kind {
            ProviderKind::Value(slot) => slot.lock().take().ok_or_else(|| {
                OrchestratorError::with_message(
                    ErrorCode::Internal,
                    "value provider materialized twice",
                )
            }),
            ProviderKind::Factory(factory) => Ok(factory()),
            ProviderKind::FactoryWith(factory) => factory(container),
        }
    }
}

impl<T: Send + Sync + 'static> From<T> for Provider<T> {
    fn from(value: T) -> Self {
        Self::value(value)
    }
}

impl<T> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match &self.kind {
            ProviderKind::Value(_) => "value",
            ProviderKind::Factory(_) => "factory",
            ProviderKind::FactoryWith(_) => "factory_with",
        };
        f.debug_struct("Provider").field("shape", &shape).finish()
    }
}
