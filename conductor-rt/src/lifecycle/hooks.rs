//! The `Lifecycle` trait components implement to receive phase hooks.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::state::LifecycleState;
use crate::diagnostic::BoxError;

/// Lifecycle hooks for a managed component.
///
/// Every hook defaults to a no-op so components override only the phases
/// they care about. Hooks may suspend; the kernel races each invocation
/// against the effective deadline for its phase, so long-running hooks
/// should reach an await point regularly.
///
/// Hooks take `&self`: components are shared singletons, so mutable state
/// lives behind interior mutability.
///
/// # Examples
///
/// ```rust
/// use conductor_rt::lifecycle::Lifecycle;
/// use conductor_rt::diagnostic::BoxError;
/// use async_trait::async_trait;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct HttpServer {
///     running: AtomicBool,
/// }
///
/// #[async_trait]
/// impl Lifecycle for HttpServer {
///     async fn on_start(&self) -> Result<(), BoxError> {
///         self.running.store(true, Ordering::SeqCst);
///         Ok(())
///     }
///
///     async fn on_stop(&self) -> Result<(), BoxError> {
///         self.running.store(false, Ordering::SeqCst);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Lifecycle: Send + Sync + 'static {
    /// Invoked once, before the first `on_start`.
    async fn on_create(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Invoked on the `created -> started` and `stopped -> started`
    /// transitions.
    async fn on_start(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Invoked on the `started -> stopped` transition.
    async fn on_stop(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Invoked on the transition into `destroyed`.
    async fn on_destroy(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Observer called after each successful transition.
    ///
    /// Runs synchronously on the kernel's path; keep it cheap.
    fn on_transition(&self, _to: LifecycleState) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Passive;

    #[async_trait]
    impl Lifecycle for Passive {}

    #[tokio::test]
    async fn test_default_hooks_are_noops() {
        let component = Passive;

        assert!(component.on_create().await.is_ok());
        assert!(component.on_start().await.is_ok());
        assert!(component.on_stop().await.is_ok());
        assert!(component.on_destroy().await.is_ok());
        component.on_transition(LifecycleState::Started);
    }
}
