//! Container implementation: registration, hierarchical resolution,
//! ownership, and teardown.

// Layer 1: Standard library imports
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::{Mutex, RwLock};

// Layer 3: Internal module imports
use super::slot::{MaterializedValue, ProviderSlot};
use crate::diagnostic::{
    ErrorCode, ErrorContext, FailureContext, FailureDetail, OrchestratorError, Phase,
};
use crate::lifecycle::{Lifecycle, LifecycleCell, LifecycleState, PhaseReport};
use crate::provider::Provider;
use crate::token::{Token, TokenId};

const STATUS_LIVE: u8 = 0;
const STATUS_DESTROYING: u8 = 1;
const STATUS_DESTROYED: u8 = 2;

/// Hierarchical registry of providers and the singletons they yield.
///
/// Cloning a `Container` yields another handle to the same scope; child
/// scopes created with [`create_child`](Self::create_child) shadow their
/// parent's registrations and are torn down independently.
///
/// All operations except [`destroy`](Self::destroy) and the
/// [`using`](Self::using) helpers are synchronous; construction never
/// suspends.
///
/// # Examples
///
/// ```rust
/// use conductor_rt::container::Container;
/// use conductor_rt::provider::Provider;
/// use conductor_rt::token::Token;
///
/// # fn main() -> Result<(), conductor_rt::diagnostic::OrchestratorError> {
/// struct Config { port: u16 }
///
/// let container = Container::new();
/// let config = Token::<Config>::new("config");
///
/// container.register(&config, Provider::value(Config { port: 8080 }))?;
/// assert_eq!(container.resolve(&config)?.port, 8080);
/// # Ok(())
/// # }
/// ```
pub struct Container {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    name: String,
    parent: Option<Container>,
    status: AtomicU8,
    child_counter: AtomicU64,
    providers: RwLock<HashMap<TokenId, ProviderSlot>>,
    values: RwLock<HashMap<TokenId, MaterializedValue>>,
    // Construction order; teardown walks it in reverse.
    order: Mutex<Vec<TokenId>>,
    // Tokens currently materializing, for resolution-cycle detection.
    resolving: Mutex<HashSet<TokenId>>,
}

impl Container {
    /// Create a root container named `"root"`.
    pub fn new() -> Self {
        Self::named("root")
    }

    /// Create a root container with an explicit scope name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::build(name.into(), None)
    }

    fn build(name: String, parent: Option<Container>) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                name,
                parent,
                status: AtomicU8::new(STATUS_LIVE),
                child_counter: AtomicU64::new(0),
                providers: RwLock::new(HashMap::new()),
                values: RwLock::new(HashMap::new()),
                order: Mutex::new(Vec::new()),
                resolving: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Scope name, used in error context.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Register a plain (non-lifecycle) component provider.
    ///
    /// Fails with ORK1007 when the token is already registered on this
    /// container and with ORK1005 after [`destroy`](Self::destroy).
    pub fn register<T: Send + Sync + 'static>(
        &self,
        token: &Token<T>,
        provider: impl Into<Provider<T>>,
    ) -> Result<(), OrchestratorError> {
        let provider = provider.into();
        let construct = Arc::new(move |owner: &Container| {
            let value = provider.materialize(owner)?;
            Ok(MaterializedValue {
                value: Arc::new(value),
                cell: None,
            })
        });
        self.insert_slot(token.id(), token.description_arc(), construct)
    }

    /// Register a lifecycle-managed component provider.
    ///
    /// The constructed value is wrapped in a kernel cell, so this container
    /// stops and destroys it on teardown. The orchestrator registers all of
    /// its nodes through this path.
    pub fn register_component<T: Lifecycle>(
        &self,
        token: &Token<T>,
        provider: impl Into<Provider<T>>,
    ) -> Result<(), OrchestratorError> {
        let provider = provider.into();
        let description = token.description_arc();
        let cell_description = Arc::clone(&description);
        let construct = Arc::new(move |owner: &Container| {
            let value = Arc::new(provider.materialize(owner)?);
            let cell = Arc::new(LifecycleCell::new(
                Arc::clone(&cell_description),
                Arc::clone(&value) as Arc<dyn Lifecycle>,
            ));
            Ok(MaterializedValue {
                value,
                cell: Some(cell),
            })
        });
        self.insert_slot(token.id(), description, construct)
    }

    /// Whether the token is registered here or in any ancestor scope.
    pub fn has<T>(&self, token: &Token<T>) -> bool {
        self.has_id(token.id())
    }

    pub(crate) fn has_id(&self, id: TokenId) -> bool {
        let mut current = Some(self.clone());
        while let Some(container) = current {
            if container.inner.providers.read().contains_key(&id) {
                return true;
            }
            current = container.inner.parent.clone();
        }
        false
    }

    /// Resolve the token if it is registered anywhere up the chain.
    ///
    /// Returns `Ok(None)` for unregistered tokens; construction failures and
    /// destroyed-container use still error.
    pub fn get<T: Send + Sync + 'static>(
        &self,
        token: &Token<T>,
    ) -> Result<Option<Arc<T>>, OrchestratorError> {
        match self.ensure_id(token.id())? {
            None => Ok(None),
            Some(materialized) => {
                materialized.value.downcast::<T>().map(Some).map_err(|_| {
                    OrchestratorError::with_message(
                        ErrorCode::Internal,
                        "stored value does not match token type",
                    )
                    .with_context(self.context().token(token.description()))
                })
            }
        }
    }

    /// Resolve the token, failing with ORK1006 when it is missing.
    ///
    /// Two resolves of the same token return the identical singleton.
    pub fn resolve<T: Send + Sync + 'static>(
        &self,
        token: &Token<T>,
    ) -> Result<Arc<T>, OrchestratorError> {
        self.get(token)?.ok_or_else(|| {
            OrchestratorError::new(ErrorCode::MissingProvider)
                .with_context(self.context().token(token.description()))
        })
    }

    /// Create a child scope whose resolution falls back to this container.
    pub fn create_child(&self) -> Result<Container, OrchestratorError> {
        self.ensure_live()?;
        let ordinal = self.inner.child_counter.fetch_add(1, Ordering::Relaxed);
        Ok(Self::build(
            format!("{}/child-{ordinal}", self.inner.name),
            Some(self.clone()),
        ))
    }

    /// Materialize (if needed) and return the stored entry for a token,
    /// searching from this scope to the root.
    pub(crate) fn ensure_id(
        &self,
        id: TokenId,
    ) -> Result<Option<MaterializedValue>, OrchestratorError> {
        self.ensure_live()?;
        let mut current = Some(self.clone());
        while let Some(container) = current {
            if container.inner.providers.read().contains_key(&id) {
                return container.materialize_local(id).map(Some);
            }
            current = container.inner.parent.clone();
        }
        Ok(None)
    }

    /// Kernel cell for a materialized component, searching up the chain.
    pub(crate) fn cell_for(&self, id: TokenId) -> Option<Arc<LifecycleCell>> {
        let mut current = Some(self.clone());
        while let Some(container) = current {
            if let Some(materialized) = container.inner.values.read().get(&id) {
                return materialized.cell.clone();
            }
            current = container.inner.parent.clone();
        }
        None
    }

    fn materialize_local(&self, id: TokenId) -> Result<MaterializedValue, OrchestratorError> {
        self.ensure_live()?;

        if let Some(existing) = self.inner.values.read().get(&id) {
            return Ok(existing.clone());
        }

        let description = self
            .inner
            .providers
            .read()
            .get(&id)
            .map(|slot| Arc::clone(&slot.description));

        {
            let mut resolving = self.inner.resolving.lock();
            if !resolving.insert(id) {
                let mut context = self.context();
                if let Some(description) = &description {
                    context = context.token(description.as_ref());
                }
                return Err(
                    OrchestratorError::new(ErrorCode::ResolutionCycle).with_context(context)
                );
            }
        }

        let construct = self
            .inner
            .providers
            .read()
            .get(&id)
            .map(|slot| Arc::clone(&slot.construct));

        let outcome = match construct {
            Some(construct) => construct(self),
            None => Err(OrchestratorError::with_message(
                ErrorCode::Internal,
                "provider slot vanished during materialization",
            )),
        };

        self.inner.resolving.lock().remove(&id);
        let materialized = outcome?;

        let mut values = self.inner.values.write();
        if let Some(existing) = values.get(&id) {
            return Ok(existing.clone());
        }
        values.insert(id, materialized.clone());
        drop(values);
        self.inner.order.lock().push(id);

        Ok(materialized)
    }

    /// Stop (if started) and destroy every component this container
    /// constructed, in reverse construction order.
    ///
    /// Failures are collected per component and raised as one ORK1016
    /// aggregate after the full traversal. After a destroy — successful or
    /// not — every further operation fails with ORK1005.
    pub async fn destroy(&self) -> Result<(), OrchestratorError> {
        if self
            .inner
            .status
            .compare_exchange(
                STATUS_LIVE,
                STATUS_DESTROYING,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_err()
        {
            return Err(self.destroyed_error());
        }

        let order: Vec<TokenId> = {
            let order = self.inner.order.lock();
            order.iter().rev().copied().collect()
        };

        let mut details = Vec::new();
        for id in order {
            let cell = self
                .inner
                .values
                .read()
                .get(&id)
                .and_then(|materialized| materialized.cell.clone());
            let Some(cell) = cell else { continue };

            if cell.state() == LifecycleState::Started {
                let report = cell.stop(None).await;
                if !report.ok() {
                    // Still started; the state machine would reject destroy.
                    details.push(teardown_detail(cell.token(), Phase::Stop, report));
                    continue;
                }
            }

            if cell.state() != LifecycleState::Destroyed {
                let report = cell.destroy(None).await;
                if !report.ok() {
                    details.push(teardown_detail(cell.token(), Phase::Destroy, report));
                }
            }
        }

        self.inner.values.write().clear();
        self.inner.providers.write().clear();
        self.inner.order.lock().clear();
        self.inner.status.store(STATUS_DESTROYED, Ordering::SeqCst);

        if details.is_empty() {
            Ok(())
        } else {
            Err(
                OrchestratorError::aggregate(ErrorCode::ContainerTeardownFailed, details)
                    .with_context(self.context()),
            )
        }
    }

    fn ensure_live(&self) -> Result<(), OrchestratorError> {
        if self.inner.status.load(Ordering::SeqCst) == STATUS_LIVE {
            Ok(())
        } else {
            Err(self.destroyed_error())
        }
    }

    fn destroyed_error(&self) -> OrchestratorError {
        OrchestratorError::new(ErrorCode::ContainerDestroyed).with_context(self.context())
    }

    fn context(&self) -> ErrorContext {
        ErrorContext::new().scope(&self.inner.name)
    }

    pub(crate) fn insert_slot(
        &self,
        id: TokenId,
        description: Arc<str>,
        construct: super::slot::Constructor,
    ) -> Result<(), OrchestratorError> {
        self.ensure_live()?;
        let mut providers = self.inner.providers.write();
        if providers.contains_key(&id) {
            return Err(OrchestratorError::new(ErrorCode::DuplicateRegistration)
                .with_context(self.context().token(description.as_ref())));
        }
        providers.insert(
            id,
            ProviderSlot {
                description,
                construct,
            },
        );
        Ok(())
    }
}

fn teardown_detail(token: &str, phase: Phase, report: PhaseReport) -> FailureDetail {
    let timed_out = report.timed_out;
    let duration = report.duration;
    let error = report
        .error
        .unwrap_or_else(|| OrchestratorError::new(ErrorCode::Internal));
    FailureDetail::new(
        token,
        phase,
        FailureContext::Container,
        timed_out,
        duration,
        error,
    )
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.inner.name)
            .field("providers", &self.inner.providers.read().len())
            .field("values", &self.inner.values.read().len())
            .finish()
    }
}
