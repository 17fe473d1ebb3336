//! Node declaration types for graph registration.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::config::Timeouts;
use crate::graph::DepRef;
use crate::provider::Provider;
use crate::token::Token;

/// Declaration of one orchestrated component: its provider, the tokens it
/// depends on, and optional per-node phase deadlines.
///
/// # Examples
///
/// ```rust
/// use conductor_rt::orchestrator::{NodeSpec, Timeouts};
/// use conductor_rt::provider::Provider;
/// use conductor_rt::token::Token;
/// use std::time::Duration;
///
/// struct Database;
/// struct Api;
///
/// let database = Token::<Database>::new("database");
///
/// let spec = NodeSpec::new(Provider::factory(|| Api))
///     .depends_on(&database)
///     .with_timeouts(Timeouts::uniform(Duration::from_secs(10)));
/// ```
#[derive(Debug)]
pub struct NodeSpec<T> {
    pub(crate) provider: Provider<T>,
    pub(crate) dependencies: Vec<DepRef>,
    pub(crate) timeouts: Timeouts,
}

impl<T: Send + Sync + 'static> NodeSpec<T> {
    /// Declare a node constructed by the given provider.
    pub fn new(provider: impl Into<Provider<T>>) -> Self {
        Self {
            provider: provider.into(),
            dependencies: Vec::new(),
            timeouts: Timeouts::none(),
        }
    }

    /// Declare a dependency on another token.
    ///
    /// Duplicates and self-references are normalized away at registration.
    pub fn depends_on<U>(mut self, token: &Token<U>) -> Self {
        self.dependencies.push(DepRef::from(token));
        self
    }

    /// Override phase deadlines for this node.
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_spec_collects_dependencies_in_order() {
        let a = Token::<u8>::new("a");
        let b = Token::<u8>::new("b");

        let spec = NodeSpec::<u8>::new(Provider::factory(|| 0u8))
            .depends_on(&a)
            .depends_on(&b);

        let ids: Vec<_> = spec.dependencies.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec![a.id(), b.id()]);
    }

    #[test]
    fn test_spec_timeouts_default_to_none() {
        let spec = NodeSpec::<u8>::new(Provider::factory(|| 0u8));
        assert_eq!(spec.timeouts, Timeouts::none());

        let spec = spec.with_timeouts(Timeouts::uniform(Duration::from_secs(1)));
        assert_eq!(spec.timeouts, Timeouts::uniform(Duration::from_secs(1)));
    }
}
