//! Orchestrator implementation: layered start/stop/destroy with rollback.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tracing::debug;

// Layer 3: Internal module imports
use super::config::{OrchestratorConfig, Timeouts};
use super::types::NodeSpec;
use crate::container::Container;
use crate::diagnostic::{
    emit, ErrorCode, ErrorContext, FailureContext, FailureDetail, OrchestratorError, Phase,
};
use crate::graph::{GraphNode, Layers};
use crate::lifecycle::{Lifecycle, LifecycleCell, LifecycleState, PhaseReport};
use crate::queue::{self, Job, RunOptions};
use crate::telemetry::{
    Collector, ComponentEvent, NoopCollector, OrchestrationEvent, PhaseEvent,
};
use crate::token::{Token, TokenId};

/// Result of one phase job, carrying the component identity alongside the
/// kernel's report.
struct PhaseOutcome {
    token: String,
    report: PhaseReport,
}

/// Result of one destroy job: the optional preceding stop plus the destroy
/// attempt itself.
struct DestroyOutcome {
    token: String,
    stop_report: Option<PhaseReport>,
    destroy_report: Option<PhaseReport>,
}

#[derive(Default)]
struct NodeTable {
    entries: Vec<GraphNode>,
    index: HashMap<TokenId, usize>,
    timeouts: HashMap<TokenId, Timeouts>,
}

/// Brings a component graph up in dependency order, tears it down in
/// reverse, and reports failures as structured aggregates.
///
/// The orchestrator owns (or borrows) a [`Container`] for construction and
/// singleton ownership, computes topological layers over the declared graph,
/// and drives every component's [`LifecycleCell`] through the per-layer job
/// queue.
///
/// # Examples
///
/// ```rust,ignore
/// use conductor_rt::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), OrchestratorError> {
///     let orchestrator = Orchestrator::new(OrchestratorConfig::default());
///
///     let database = Token::<Database>::new("database");
///     let api = Token::<Api>::new("api");
///
///     orchestrator.register(&database, NodeSpec::new(Provider::factory(Database::new)))?;
///     orchestrator.register(
///         &api,
///         NodeSpec::new(Provider::factory(Api::new)).depends_on(&database),
///     )?;
///
///     orchestrator.start().await?;
///     orchestrator.stop().await?;
///     orchestrator.destroy().await
/// }
/// ```
pub struct Orchestrator<C: Collector<OrchestrationEvent> = NoopCollector<OrchestrationEvent>> {
    container: Container,
    config: OrchestratorConfig,
    collector: C,
    nodes: Mutex<NodeTable>,
    layers_memo: Mutex<Option<Arc<Layers>>>,
}

impl Orchestrator {
    /// Create an orchestrator owning a fresh root container.
    pub fn new(config: OrchestratorConfig) -> Self {
        Self::with_collector(Container::new(), config, NoopCollector::new())
    }

    /// Create an orchestrator over an existing container.
    pub fn with_container(container: Container, config: OrchestratorConfig) -> Self {
        Self::with_collector(container, config, NoopCollector::new())
    }
}

impl<C: Collector<OrchestrationEvent>> Orchestrator<C> {
    /// Create an orchestrator with a telemetry collector attached.
    pub fn with_collector(container: Container, config: OrchestratorConfig, collector: C) -> Self {
        Self {
            container,
            config,
            collector,
            nodes: Mutex::new(NodeTable::default()),
            layers_memo: Mutex::new(None),
        }
    }

    /// The container backing this orchestrator.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// The active configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Register one component node.
    ///
    /// Duplicate tokens are refused with ORK1007. The dependency list is
    /// deduplicated and self-references are dropped; the provider lands in
    /// the container; any memoized layering is invalidated.
    pub fn register<T: Lifecycle>(
        &self,
        token: &Token<T>,
        spec: NodeSpec<T>,
    ) -> Result<(), OrchestratorError> {
        let NodeSpec {
            provider,
            dependencies,
            timeouts,
        } = spec;

        let mut table = self.nodes.lock();
        if table.index.contains_key(&token.id()) {
            return Err(OrchestratorError::new(ErrorCode::DuplicateRegistration)
                .with_context(ErrorContext::new().token(token.description())));
        }

        self.container.register_component(token, provider)?;

        let node = GraphNode::new(token.id(), token.description_arc(), dependencies);
        let index = table.entries.len();
        table.index.insert(token.id(), index);
        table.entries.push(node);
        table.timeouts.insert(token.id(), timeouts);
        drop(table);

        *self.layers_memo.lock() = None;
        Ok(())
    }

    /// Current lifecycle state of a registered component.
    ///
    /// `None` until the component has been constructed.
    pub fn state_of<T>(&self, token: &Token<T>) -> Option<LifecycleState> {
        self.container.cell_for(token.id()).map(|cell| cell.state())
    }

    /// Start every component, layer by layer.
    ///
    /// Components already started are treated as prior successes. On any
    /// failure within a layer, every started component is stopped again in
    /// reverse layer order (rollback) and ORK1013 is raised carrying the
    /// layer failures followed by one detail per rolled-back component;
    /// later layers are not attempted.
    pub async fn start(&self) -> Result<(), OrchestratorError> {
        let layers = self.plan(Phase::Start).await?;

        for (layer_index, layer) in layers.iter().enumerate() {
            let mut jobs: Vec<Job<PhaseOutcome>> = Vec::new();
            for slot in layer {
                let state = self.container.cell_for(slot.id).map(|cell| cell.state());
                if state == Some(LifecycleState::Started) {
                    continue;
                }

                let container = self.container.clone();
                let id = slot.id;
                let token = slot.description.to_string();
                let deadline = self.effective_timeout(id, Phase::Start);
                jobs.push(Box::pin(async move {
                    let report = match container.ensure_id(id) {
                        Err(err) => PhaseReport::rejected(err),
                        Ok(None) => PhaseReport::rejected(OrchestratorError::with_message(
                            ErrorCode::Internal,
                            "registered node has no provider",
                        )),
                        Ok(Some(materialized)) => match materialized.cell {
                            Some(cell) => cell.start(deadline).await,
                            None => PhaseReport::rejected(OrchestratorError::with_message(
                                ErrorCode::Internal,
                                "registered node has no lifecycle cell",
                            )),
                        },
                    };
                    PhaseOutcome { token, report }
                }));
            }

            if jobs.is_empty() {
                continue;
            }

            let outcomes = queue::run(jobs, &self.queue_options())
                .await
                .map_err(OrchestratorError::from)?;

            let mut failures: Vec<FailureDetail> = Vec::new();
            let mut succeeded = 0usize;
            for outcome in outcomes {
                if outcome.report.ok() {
                    succeeded += 1;
                    self.record(OrchestrationEvent::Component(ComponentEvent::succeeded(
                        outcome.token.as_str(),
                        Phase::Start,
                        outcome.report.duration_ms(),
                    )))
                    .await;
                } else {
                    failures
                        .push(self.failure_detail(outcome, Phase::Start, FailureContext::Normal).await);
                }
            }

            self.record(OrchestrationEvent::Phase(PhaseEvent::layer_settled(
                Phase::Start,
                layer_index,
                succeeded,
                failures.len(),
            )))
            .await;

            if !failures.is_empty() {
                let rollback_failures = self.rollback(&layers).await;
                failures.extend(rollback_failures);

                let err = OrchestratorError::aggregate(ErrorCode::StartFailed, failures)
                    .with_context(ErrorContext::new().phase(Phase::Start));
                emit::log_error(&err);
                return Err(err);
            }
        }

        Ok(())
    }

    /// Stop every started component, traversing layers in reverse.
    ///
    /// Every component is attempted; failures are collected and raised as a
    /// single ORK1014 aggregate after the traversal.
    pub async fn stop(&self) -> Result<(), OrchestratorError> {
        let layers = self.plan(Phase::Stop).await?;
        let forward: Vec<_> = layers.iter().collect();

        let mut details: Vec<FailureDetail> = Vec::new();
        for (layer_index, layer) in forward.iter().enumerate().rev() {
            let mut jobs: Vec<Job<PhaseOutcome>> = Vec::new();
            for slot in *layer {
                let Some(cell) = self.container.cell_for(slot.id) else {
                    continue;
                };
                if cell.state() != LifecycleState::Started {
                    continue;
                }
                jobs.push(self.stop_job(slot.id, cell));
            }

            if jobs.is_empty() {
                continue;
            }

            let outcomes = queue::run(jobs, &self.queue_options())
                .await
                .map_err(OrchestratorError::from)?;

            let mut succeeded = 0usize;
            let mut failed = 0usize;
            for outcome in outcomes {
                if outcome.report.ok() {
                    succeeded += 1;
                    self.record(OrchestrationEvent::Component(ComponentEvent::succeeded(
                        outcome.token.as_str(),
                        Phase::Stop,
                        outcome.report.duration_ms(),
                    )))
                    .await;
                } else {
                    failed += 1;
                    details
                        .push(self.failure_detail(outcome, Phase::Stop, FailureContext::Normal).await);
                }
            }

            self.record(OrchestrationEvent::Phase(PhaseEvent::layer_settled(
                Phase::Stop,
                layer_index,
                succeeded,
                failed,
            )))
            .await;
        }

        if details.is_empty() {
            Ok(())
        } else {
            let err = OrchestratorError::aggregate(ErrorCode::StopFailed, details)
                .with_context(ErrorContext::new().phase(Phase::Stop));
            emit::log_error(&err);
            Err(err)
        }
    }

    /// Destroy every component in reverse layer order, then tear down the
    /// container.
    ///
    /// Started components are stopped first (recording any stop failure); a
    /// component whose stop failed keeps its state, so its destructor is
    /// skipped rather than rejected. All failures — including the
    /// container's own teardown failures — are raised as one ORK1017
    /// aggregate after everything has been attempted.
    pub async fn destroy(&self) -> Result<(), OrchestratorError> {
        let layers = self.plan(Phase::Destroy).await?;
        let forward: Vec<_> = layers.iter().collect();

        let mut details: Vec<FailureDetail> = Vec::new();
        for (layer_index, layer) in forward.iter().enumerate().rev() {
            let mut jobs: Vec<Job<DestroyOutcome>> = Vec::new();
            for slot in *layer {
                let Some(cell) = self.container.cell_for(slot.id) else {
                    continue;
                };
                if cell.state() == LifecycleState::Destroyed {
                    continue;
                }

                let stop_deadline = self.effective_timeout(slot.id, Phase::Stop);
                let destroy_deadline = self.effective_timeout(slot.id, Phase::Destroy);
                let token = slot.description.to_string();
                jobs.push(Box::pin(async move {
                    let mut stop_report = None;
                    if cell.state() == LifecycleState::Started {
                        stop_report = Some(cell.stop(stop_deadline).await);
                    }

                    let stop_failed = stop_report.as_ref().is_some_and(|report| !report.ok());
                    let destroy_report = if stop_failed {
                        // Still started; the state machine would reject it.
                        None
                    } else {
                        Some(cell.destroy(destroy_deadline).await)
                    };

                    DestroyOutcome {
                        token,
                        stop_report,
                        destroy_report,
                    }
                }));
            }

            if jobs.is_empty() {
                continue;
            }

            let outcomes = queue::run(jobs, &self.queue_options())
                .await
                .map_err(OrchestratorError::from)?;

            let mut succeeded = 0usize;
            let mut failed = 0usize;
            for outcome in outcomes {
                if let Some(report) = outcome.stop_report {
                    if report.ok() {
                        self.record(OrchestrationEvent::Component(ComponentEvent::succeeded(
                            outcome.token.as_str(),
                            Phase::Stop,
                            report.duration_ms(),
                        )))
                        .await;
                    } else {
                        failed += 1;
                        let phase_outcome = PhaseOutcome {
                            token: outcome.token.clone(),
                            report,
                        };
                        details.push(
                            self.failure_detail(phase_outcome, Phase::Stop, FailureContext::Normal)
                                .await,
                        );
                    }
                }

                if let Some(report) = outcome.destroy_report {
                    if report.ok() {
                        succeeded += 1;
                        self.record(OrchestrationEvent::Component(ComponentEvent::succeeded(
                            outcome.token.as_str(),
                            Phase::Destroy,
                            report.duration_ms(),
                        )))
                        .await;
                    } else {
                        failed += 1;
                        let phase_outcome = PhaseOutcome {
                            token: outcome.token.clone(),
                            report,
                        };
                        details.push(
                            self.failure_detail(
                                phase_outcome,
                                Phase::Destroy,
                                FailureContext::Normal,
                            )
                            .await,
                        );
                    }
                }
            }

            self.record(OrchestrationEvent::Phase(PhaseEvent::layer_settled(
                Phase::Destroy,
                layer_index,
                succeeded,
                failed,
            )))
            .await;
        }

        if let Err(container_err) = self.container.destroy().await {
            if container_err.is_aggregate() {
                details.extend(container_err.into_details());
            } else {
                details.push(FailureDetail::new(
                    "container",
                    Phase::Destroy,
                    FailureContext::Container,
                    false,
                    Duration::ZERO,
                    container_err,
                ));
            }
        }

        if details.is_empty() {
            Ok(())
        } else {
            let err = OrchestratorError::aggregate(ErrorCode::DestroyFailed, details)
                .with_context(ErrorContext::new().phase(Phase::Destroy));
            emit::log_error(&err);
            Err(err)
        }
    }

    /// Stop every currently started component in reverse layer order with
    /// rollback context, recording one detail per component.
    async fn rollback(&self, layers: &Layers) -> Vec<FailureDetail> {
        let registered: Vec<TokenId> = {
            let table = self.nodes.lock();
            table.entries.iter().map(GraphNode::id).collect()
        };
        let started: Vec<TokenId> = registered
            .into_iter()
            .filter(|id| {
                self.container
                    .cell_for(*id)
                    .map(|cell| cell.state() == LifecycleState::Started)
                    .unwrap_or(false)
            })
            .collect();

        let mut details: Vec<FailureDetail> = Vec::new();
        for bucket in layers.group(&started) {
            let mut jobs: Vec<Job<PhaseOutcome>> = Vec::new();
            for id in bucket {
                let Some(cell) = self.container.cell_for(id) else {
                    continue;
                };
                jobs.push(self.stop_job(id, cell));
            }

            let outcomes = match queue::run(jobs, &self.queue_options()).await {
                Ok(outcomes) => outcomes,
                Err(queue_err) => {
                    details.push(FailureDetail::from(OrchestratorError::from(queue_err)));
                    continue;
                }
            };

            for outcome in outcomes {
                if outcome.report.ok() {
                    self.record(OrchestrationEvent::Component(ComponentEvent::succeeded(
                        outcome.token.as_str(),
                        Phase::Stop,
                        outcome.report.duration_ms(),
                    )))
                    .await;
                    // Rolled-back components stay visible in the aggregate,
                    // marked with the triggering code.
                    details.push(FailureDetail::new(
                        outcome.token,
                        Phase::Stop,
                        FailureContext::Rollback,
                        false,
                        outcome.report.duration,
                        OrchestratorError::with_message(
                            ErrorCode::StartFailed,
                            "component stopped while rolling back a failed start",
                        ),
                    ));
                } else {
                    details.push(
                        self.failure_detail(outcome, Phase::Stop, FailureContext::Rollback)
                            .await,
                    );
                }
            }
        }
        details
    }

    /// Compute (or reuse) the layering and trace it.
    async fn plan(&self, phase: Phase) -> Result<Arc<Layers>, OrchestratorError> {
        if let Some(layers) = self.layers_memo.lock().clone() {
            return Ok(layers);
        }

        let entries = self.nodes.lock().entries.clone();
        let layers = Arc::new(Layers::compute(&entries)?);
        *self.layers_memo.lock() = Some(Arc::clone(&layers));

        debug!(layers = ?layers.descriptions(), "dependency layers computed");
        self.record(OrchestrationEvent::Phase(PhaseEvent::planned(
            phase,
            layers.descriptions(),
        )))
        .await;

        Ok(layers)
    }

    /// Effective deadline for one node and phase: the node's entry when set,
    /// else the orchestrator default. Zero disables the deadline.
    fn effective_timeout(&self, id: TokenId, phase: Phase) -> Option<Duration> {
        let node_entry = {
            let table = self.nodes.lock();
            table
                .timeouts
                .get(&id)
                .map(|timeouts| timeouts.for_phase(phase))
                .unwrap_or(None)
        };
        node_entry
            .or_else(|| self.config.timeouts.for_phase(phase))
            .filter(|deadline| !deadline.is_zero())
    }

    fn stop_job(&self, id: TokenId, cell: Arc<LifecycleCell>) -> Job<PhaseOutcome> {
        let deadline = self.effective_timeout(id, Phase::Stop);
        let token = cell.token().to_owned();
        Box::pin(async move {
            let report = cell.stop(deadline).await;
            PhaseOutcome { token, report }
        })
    }

    fn queue_options(&self) -> RunOptions {
        RunOptions {
            concurrency: self.config.concurrency,
            task_timeout: None,
            deadline: None,
        }
    }

    /// Fold a failed outcome into a detail record, emitting the failure
    /// event on the way.
    async fn failure_detail(
        &self,
        outcome: PhaseOutcome,
        phase: Phase,
        context: FailureContext,
    ) -> FailureDetail {
        let timed_out = outcome.report.timed_out;
        let duration = outcome.report.duration;
        let error = outcome
            .report
            .error
            .unwrap_or_else(|| OrchestratorError::new(ErrorCode::Internal));

        self.record(OrchestrationEvent::Component(ComponentEvent::failed(
            outcome.token.as_str(),
            phase,
            context,
            timed_out,
            u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            error.to_string(),
        )))
        .await;

        FailureDetail::new(outcome.token, phase, context, timed_out, duration, error)
    }

    /// Best-effort telemetry: collector failures never disturb orchestration.
    async fn record(&self, event: OrchestrationEvent) {
        let _ = self.collector.record(event).await;
    }
}

impl<C: Collector<OrchestrationEvent>> std::fmt::Debug for Orchestrator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("container", &self.container)
            .field("nodes", &self.nodes.lock().entries.len())
            .finish()
    }
}
