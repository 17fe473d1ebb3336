//! Orchestrator Failure Handling Integration Tests
//!
//! Deadline expiry, failing destructors, stop aggregation, and telemetry
//! collection under failure.
//!
//! # Current Test Coverage
//!
//! 1. **Deadlines** (2 tests)
//!    - Hook exceeding its deadline times out with ORK1021 inside ORK1013
//!    - Per-node timeout beats the orchestrator default
//!
//! 2. **Teardown Failures** (2 tests)
//!    - A failing destructor does not block other destructors (ORK1017)
//!    - Stop failures are aggregated after attempting every component
//!
//! 3. **Telemetry** (1 test)
//!    - Component failures are recorded alongside successes

// Layer 1: Standard library imports
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use parking_lot::Mutex;

// Layer 3: Internal module imports
use conductor_rt::prelude::*;
use conductor_rt::telemetry::ComponentEventKind;

struct Sluggish;

#[async_trait]
impl Lifecycle for Sluggish {
    async fn on_start(&self) -> Result<(), BoxError> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(())
    }
}

struct BrokenDestroy {
    name: &'static str,
    sink: Arc<Mutex<Vec<String>>>,
    broken: bool,
}

#[async_trait]
impl Lifecycle for BrokenDestroy {
    async fn on_destroy(&self) -> Result<(), BoxError> {
        if self.broken {
            return Err("destructor failed".into());
        }
        self.sink.lock().push(format!("{}.destroy", self.name));
        Ok(())
    }
}

struct BrokenStop;

#[async_trait]
impl Lifecycle for BrokenStop {
    async fn on_stop(&self) -> Result<(), BoxError> {
        Err("stop failed".into())
    }
}

// ============================================================================
// TEST GROUP 1: Deadlines
// ============================================================================

#[tokio::test]
async fn test_hook_timeout_folds_into_start_aggregate() {
    let orchestrator = Orchestrator::new(OrchestratorConfig::default());
    let slow = Token::<Sluggish>::new("slow");

    orchestrator
        .register(
            &slow,
            NodeSpec::new(Provider::factory(|| Sluggish)).with_timeouts(Timeouts {
                on_start: Some(Duration::from_millis(50)),
                ..Timeouts::none()
            }),
        )
        .ok();

    let err = orchestrator.start().await.err();
    assert!(err.is_some());
    let Some(err) = err else { return };

    assert_eq!(err.code(), ErrorCode::StartFailed);
    assert_eq!(err.details().len(), 1);

    let detail = &err.details()[0];
    assert_eq!(detail.token, "slow");
    assert_eq!(detail.phase, Phase::Start);
    assert_eq!(detail.context, FailureContext::Normal);
    assert!(detail.timed_out);
    // Duration tracks the deadline, within scheduling skew.
    assert!(detail.duration >= Duration::from_millis(50));
    assert!(detail.duration < Duration::from_millis(150));
    assert_eq!(detail.error.code(), ErrorCode::HookTimeout);
    assert!(detail.error.to_string().contains("ORK1021"));
}

#[tokio::test]
async fn test_node_timeout_overrides_orchestrator_default() {
    // Default deadline is generous; the node's own deadline is what expires.
    let config = OrchestratorConfig::builder()
        .with_start_timeout(Duration::from_secs(30))
        .build();
    let Ok(config) = config else { return };

    let orchestrator = Orchestrator::new(config);
    let slow = Token::<Sluggish>::new("slow");

    orchestrator
        .register(
            &slow,
            NodeSpec::new(Provider::factory(|| Sluggish)).with_timeouts(Timeouts {
                on_start: Some(Duration::from_millis(30)),
                ..Timeouts::none()
            }),
        )
        .ok();

    let err = orchestrator.start().await.err();
    let timed_out = err
        .as_ref()
        .map(|e| e.details().iter().any(|d| d.timed_out))
        .unwrap_or(false);
    assert!(timed_out);
}

// ============================================================================
// TEST GROUP 2: Teardown Failures
// ============================================================================

#[tokio::test]
async fn test_failing_destructor_does_not_block_others() {
    let sink: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let orchestrator = Orchestrator::new(OrchestratorConfig::default());

    let a = Token::<BrokenDestroy>::new("a");
    let b = Token::<BrokenDestroy>::new("b");

    let s = Arc::clone(&sink);
    orchestrator
        .register(
            &a,
            NodeSpec::new(Provider::factory(move || BrokenDestroy {
                name: "a",
                sink: Arc::clone(&s),
                broken: false,
            })),
        )
        .ok();
    let s = Arc::clone(&sink);
    orchestrator
        .register(
            &b,
            NodeSpec::new(Provider::factory(move || BrokenDestroy {
                name: "b",
                sink: Arc::clone(&s),
                broken: true,
            }))
            .depends_on(&a),
        )
        .ok();

    assert!(orchestrator.start().await.is_ok());

    let err = orchestrator.destroy().await.err();
    assert!(err.is_some());
    let Some(err) = err else { return };

    assert_eq!(err.code(), ErrorCode::DestroyFailed);
    assert_eq!(err.details().len(), 1);
    assert_eq!(err.details()[0].token, "b");
    assert_eq!(err.details()[0].phase, Phase::Destroy);

    // a's destructor still ran.
    assert_eq!(*sink.lock(), vec!["a.destroy"]);
}

#[tokio::test]
async fn test_stop_failures_aggregate_after_attempting_everything() {
    let orchestrator = Orchestrator::new(OrchestratorConfig::default());

    let a = Token::<BrokenStop>::new("a");
    let b = Token::<BrokenStop>::new("b");

    orchestrator
        .register(&a, NodeSpec::new(Provider::factory(|| BrokenStop)))
        .ok();
    orchestrator
        .register(
            &b,
            NodeSpec::new(Provider::factory(|| BrokenStop)).depends_on(&a),
        )
        .ok();

    assert!(orchestrator.start().await.is_ok());

    let err = orchestrator.stop().await.err();
    assert!(err.is_some());
    let Some(err) = err else { return };

    assert_eq!(err.code(), ErrorCode::StopFailed);
    // Both components were attempted despite both failing.
    assert_eq!(err.details().len(), 2);
    assert_eq!(err.details()[0].token, "b");
    assert_eq!(err.details()[1].token, "a");
    for detail in err.details() {
        assert_eq!(detail.phase, Phase::Stop);
        assert_eq!(detail.context, FailureContext::Normal);
        assert_eq!(detail.error.code(), ErrorCode::HookFailed);
    }
}

// ============================================================================
// TEST GROUP 3: Telemetry
// ============================================================================

#[tokio::test]
async fn test_component_failures_are_collected() {
    struct FailingStart;

    #[async_trait]
    impl Lifecycle for FailingStart {
        async fn on_start(&self) -> Result<(), BoxError> {
            Err("refused".into())
        }
    }

    let collector = InMemoryCollector::default();
    let orchestrator = Orchestrator::with_collector(
        Container::new(),
        OrchestratorConfig::default(),
        collector.clone(),
    );

    let token = Token::<FailingStart>::new("failing");
    orchestrator
        .register(&token, NodeSpec::new(Provider::factory(|| FailingStart)))
        .ok();

    let _ = orchestrator.start().await;

    let snapshot = collector.snapshot().await.ok();
    assert!(snapshot.is_some());
    let Some(snapshot) = snapshot else { return };

    assert!(snapshot.count(Severity::Error) >= 1);
    let saw_failure = snapshot.recent_events.iter().any(|event| {
        matches!(
            event,
            OrchestrationEvent::Component(component)
                if matches!(component.kind, ComponentEventKind::Failed { .. })
        )
    });
    assert!(saw_failure);
}
