//! Child scopes with guaranteed teardown.

// Layer 1: Standard library imports
use std::future::Future;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::core::Container;
use crate::diagnostic::{emit, OrchestratorError};

impl Container {
    /// Run `work` inside a fresh child scope, destroying the scope on every
    /// exit path.
    ///
    /// The parent container is untouched. When both the work and the
    /// teardown fail, the work's error wins and the teardown failure is
    /// logged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use conductor_rt::container::Container;
    /// use conductor_rt::token::Token;
    ///
    /// # async fn example() -> Result<(), conductor_rt::diagnostic::OrchestratorError> {
    /// let container = Container::new();
    /// let token = Token::<u32>::new("scoped");
    ///
    /// let doubled = container
    ///     .using(|scope| async move {
    ///         scope.register(&token, 21u32)?;
    ///         Ok(*scope.resolve(&token)? * 2)
    ///     })
    ///     .await?;
    /// assert_eq!(doubled, 42);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn using<R, Fut>(
        &self,
        work: impl FnOnce(Container) -> Fut,
    ) -> Result<R, OrchestratorError>
    where
        Fut: Future<Output = Result<R, OrchestratorError>>,
    {
        self.using_with(|_| Ok(()), work).await
    }

    /// As [`using`](Self::using), with a synchronous `setup` pass for
    /// registrations before the work runs.
    pub async fn using_with<R, Fut>(
        &self,
        setup: impl FnOnce(&Container) -> Result<(), OrchestratorError>,
        work: impl FnOnce(Container) -> Fut,
    ) -> Result<R, OrchestratorError>
    where
        Fut: Future<Output = Result<R, OrchestratorError>>,
    {
        let child = self.create_child()?;

        if let Err(setup_err) = setup(&child) {
            if let Err(teardown_err) = child.destroy().await {
                emit::log_error(&teardown_err);
            }
            return Err(setup_err);
        }

        let outcome = work(child.clone()).await;
        let teardown = child.destroy().await;

        match (outcome, teardown) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(teardown_err)) => Err(teardown_err),
            (Err(work_err), Ok(())) => Err(work_err),
            (Err(work_err), Err(teardown_err)) => {
                emit::log_error(&teardown_err);
                Err(work_err)
            }
        }
    }
}
