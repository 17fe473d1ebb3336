//! Per-component lifecycle kernel.

// Layer 1: Standard library imports
use std::sync::Arc;
use std::time::{Duration, Instant};

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tokio::task::JoinHandle;

// Layer 3: Internal module imports
use super::hooks::Lifecycle;
use super::phase::PhaseReport;
use super::state::LifecycleState;
use crate::diagnostic::{BoxError, ErrorCode, ErrorContext, OrchestratorError, Phase};

/// Drives one component through the lifecycle state machine.
///
/// The cell owns the component's hook object and its current state. Each
/// phase invocation spawns the hook onto the runtime and races it against
/// the effective deadline; an expired hook is detached — its eventual
/// completion or failure is discarded — and the phase reports a timeout.
/// State only advances when the hook completes successfully, so an observed
/// state was always reached through the allowed transitions.
pub struct LifecycleCell {
    token: Arc<str>,
    hooks: Arc<dyn Lifecycle>,
    state: Mutex<CellState>,
    // Serializes phase execution; phases for one component never interleave.
    phase_gate: tokio::sync::Mutex<()>,
}

#[derive(Debug, Clone, Copy)]
struct CellState {
    state: LifecycleState,
    create_ran: bool,
}

impl LifecycleCell {
    /// Wrap a freshly constructed component in a kernel cell.
    ///
    /// The cell begins in [`LifecycleState::Created`]; `on_create` runs
    /// lazily, inside the first start phase.
    pub fn new(token: Arc<str>, hooks: Arc<dyn Lifecycle>) -> Self {
        Self {
            token,
            hooks,
            state: Mutex::new(CellState {
                state: LifecycleState::Created,
                create_ran: false,
            }),
            phase_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Description of the component's token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Current state of the component.
    pub fn state(&self) -> LifecycleState {
        self.state.lock().state
    }

    /// Run the start phase under the given deadline.
    ///
    /// The first start also runs `on_create`, inside the same deadline.
    pub async fn start(&self, deadline: Option<Duration>) -> PhaseReport {
        let _gate = self.phase_gate.lock().await;

        let (current, needs_create) = {
            let s = self.state.lock();
            (s.state, !s.create_ran)
        };
        if !current.can_transition_to(LifecycleState::Started) {
            return PhaseReport::rejected(self.invalid_transition(current, LifecycleState::Started));
        }

        let hooks = Arc::clone(&self.hooks);
        let handle = tokio::spawn(async move {
            if needs_create {
                hooks.on_create().await?;
            }
            hooks.on_start().await
        });

        let report = self.await_hook(handle, deadline, Phase::Start).await;
        if report.ok() {
            {
                let mut s = self.state.lock();
                s.state = LifecycleState::Started;
                s.create_ran = true;
            }
            self.hooks.on_transition(LifecycleState::Started);
        }
        report
    }

    /// Run the stop phase under the given deadline.
    pub async fn stop(&self, deadline: Option<Duration>) -> PhaseReport {
        let _gate = self.phase_gate.lock().await;

        let current = self.state.lock().state;
        if !current.can_transition_to(LifecycleState::Stopped) {
            return PhaseReport::rejected(self.invalid_transition(current, LifecycleState::Stopped));
        }

        let hooks = Arc::clone(&self.hooks);
        let handle = tokio::spawn(async move { hooks.on_stop().await });

        let report = self.await_hook(handle, deadline, Phase::Stop).await;
        if report.ok() {
            self.state.lock().state = LifecycleState::Stopped;
            self.hooks.on_transition(LifecycleState::Stopped);
        }
        report
    }

    /// Run the destroy phase under the given deadline.
    ///
    /// Destruction is attempted at most once: the cell reaches
    /// [`LifecycleState::Destroyed`] whether or not the hook succeeds, so a
    /// later teardown pass never re-runs a failed destructor. The transition
    /// observer fires only on success.
    pub async fn destroy(&self, deadline: Option<Duration>) -> PhaseReport {
        let _gate = self.phase_gate.lock().await;

        let current = self.state.lock().state;
        if !current.can_transition_to(LifecycleState::Destroyed) {
            return PhaseReport::rejected(
                self.invalid_transition(current, LifecycleState::Destroyed),
            );
        }

        let hooks = Arc::clone(&self.hooks);
        let handle = tokio::spawn(async move { hooks.on_destroy().await });

        let report = self.await_hook(handle, deadline, Phase::Destroy).await;
        self.state.lock().state = LifecycleState::Destroyed;
        if report.ok() {
            self.hooks.on_transition(LifecycleState::Destroyed);
        }
        report
    }

    async fn await_hook(
        &self,
        handle: JoinHandle<Result<(), BoxError>>,
        deadline: Option<Duration>,
        phase: Phase,
    ) -> PhaseReport {
        let started = Instant::now();

        let joined = match deadline {
            Some(limit) if !limit.is_zero() => {
                match tokio::time::timeout(limit, handle).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        // Dropping the JoinHandle detaches the hook task; its
                        // late result is discarded by the runtime.
                        let elapsed = started.elapsed();
                        return PhaseReport::expired(
                            elapsed,
                            OrchestratorError::new(ErrorCode::HookTimeout)
                                .with_context(self.context(phase, elapsed)),
                        );
                    }
                }
            }
            _ => handle.await,
        };

        let elapsed = started.elapsed();
        match joined {
            Ok(Ok(())) => PhaseReport::completed(elapsed),
            Ok(Err(cause)) => PhaseReport::failed(
                elapsed,
                OrchestratorError::new(ErrorCode::HookFailed)
                    .with_context(self.context(phase, elapsed))
                    .with_source(cause),
            ),
            Err(join_err) => PhaseReport::failed(
                elapsed,
                OrchestratorError::with_message(ErrorCode::HookFailed, "lifecycle hook panicked")
                    .with_context(self.context(phase, elapsed))
                    .with_source(Box::new(join_err)),
            ),
        }
    }

    fn context(&self, phase: Phase, duration: Duration) -> ErrorContext {
        ErrorContext::new()
            .token(self.token.as_ref())
            .phase(phase)
            .duration(duration)
    }

    fn invalid_transition(&self, from: LifecycleState, to: LifecycleState) -> OrchestratorError {
        OrchestratorError::with_message(
            ErrorCode::InvalidTransition,
            format!("invalid lifecycle transition {from} -> {to}"),
        )
        .with_context(ErrorContext::new().token(self.token.as_ref()))
    }
}

impl std::fmt::Debug for LifecycleCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleCell")
            .field("token", &self.token)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use parking_lot::Mutex as SyncMutex;

    use super::*;

    #[derive(Default)]
    struct Probe {
        creates: AtomicU32,
        starts: AtomicU32,
        stops: AtomicU32,
        destroys: AtomicU32,
        transitions: SyncMutex<Vec<LifecycleState>>,
    }

    #[async_trait]
    impl Lifecycle for Probe {
        async fn on_create(&self) -> Result<(), BoxError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn on_start(&self) -> Result<(), BoxError> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn on_stop(&self) -> Result<(), BoxError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn on_destroy(&self) -> Result<(), BoxError> {
            self.destroys.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_transition(&self, to: LifecycleState) {
            self.transitions.lock().push(to);
        }
    }

    struct FailingStart;

    #[async_trait]
    impl Lifecycle for FailingStart {
        async fn on_start(&self) -> Result<(), BoxError> {
            Err("boom".into())
        }
    }

    struct SlowStart;

    #[async_trait]
    impl Lifecycle for SlowStart {
        async fn on_start(&self) -> Result<(), BoxError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        }
    }

    fn cell_with(hooks: Arc<dyn Lifecycle>) -> LifecycleCell {
        LifecycleCell::new(Arc::from("component"), hooks)
    }

    #[tokio::test]
    async fn test_full_lifecycle_path() {
        let probe = Arc::new(Probe::default());
        let cell = cell_with(Arc::clone(&probe) as Arc<dyn Lifecycle>);

        assert_eq!(cell.state(), LifecycleState::Created);

        assert!(cell.start(None).await.ok());
        assert_eq!(cell.state(), LifecycleState::Started);

        assert!(cell.stop(None).await.ok());
        assert_eq!(cell.state(), LifecycleState::Stopped);

        assert!(cell.destroy(None).await.ok());
        assert_eq!(cell.state(), LifecycleState::Destroyed);

        assert_eq!(probe.creates.load(Ordering::SeqCst), 1);
        assert_eq!(probe.starts.load(Ordering::SeqCst), 1);
        assert_eq!(probe.stops.load(Ordering::SeqCst), 1);
        assert_eq!(probe.destroys.load(Ordering::SeqCst), 1);
        assert_eq!(
            *probe.transitions.lock(),
            vec![
                LifecycleState::Started,
                LifecycleState::Stopped,
                LifecycleState::Destroyed
            ]
        );
    }

    #[tokio::test]
    async fn test_create_runs_only_before_first_start() {
        let probe = Arc::new(Probe::default());
        let cell = cell_with(Arc::clone(&probe) as Arc<dyn Lifecycle>);

        assert!(cell.start(None).await.ok());
        assert!(cell.stop(None).await.ok());
        assert!(cell.start(None).await.ok());

        assert_eq!(probe.creates.load(Ordering::SeqCst), 1);
        assert_eq!(probe.starts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_transition_runs_no_hook() {
        let probe = Arc::new(Probe::default());
        let cell = cell_with(Arc::clone(&probe) as Arc<dyn Lifecycle>);

        // Stop from Created is not in the table.
        let report = cell.stop(None).await;
        assert!(!report.ok());
        let code = report.error.map(|e| e.code());
        assert_eq!(code, Some(ErrorCode::InvalidTransition));
        assert_eq!(probe.stops.load(Ordering::SeqCst), 0);
        assert_eq!(cell.state(), LifecycleState::Created);
    }

    #[tokio::test]
    async fn test_destroy_is_terminal() {
        let cell = cell_with(Arc::new(Probe::default()));

        assert!(cell.destroy(None).await.ok());
        let report = cell.start(None).await;
        let code = report.error.map(|e| e.code());
        assert_eq!(code, Some(ErrorCode::InvalidTransition));
    }

    #[tokio::test]
    async fn test_failed_hook_leaves_state_unchanged() {
        let cell = cell_with(Arc::new(FailingStart));

        let report = cell.start(None).await;
        assert!(!report.ok());
        assert!(!report.timed_out);
        let code = report.error.map(|e| e.code());
        assert_eq!(code, Some(ErrorCode::HookFailed));
        assert_eq!(cell.state(), LifecycleState::Created);
    }

    #[tokio::test]
    async fn test_hook_deadline_expiry() {
        let cell = cell_with(Arc::new(SlowStart));

        let report = cell.start(Some(Duration::from_millis(50))).await;
        assert!(!report.ok());
        assert!(report.timed_out);
        let code = report.error.map(|e| e.code());
        assert_eq!(code, Some(ErrorCode::HookTimeout));
        // Duration tracks the deadline, not the full hook runtime.
        assert!(report.duration >= Duration::from_millis(50));
        assert!(report.duration < Duration::from_millis(150));
        assert_eq!(cell.state(), LifecycleState::Created);

        // The detached hook finishing later must not disturb anything.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(cell.state(), LifecycleState::Created);
    }

    #[tokio::test]
    async fn test_failed_destroy_still_finalizes_state() {
        struct FailingDestroy;

        #[async_trait]
        impl Lifecycle for FailingDestroy {
            async fn on_destroy(&self) -> Result<(), BoxError> {
                Err("teardown failed".into())
            }
        }

        let cell = cell_with(Arc::new(FailingDestroy));

        let report = cell.destroy(None).await;
        assert!(!report.ok());
        // The cell is terminal regardless; the destructor never re-runs.
        assert_eq!(cell.state(), LifecycleState::Destroyed);

        let retry = cell.destroy(None).await;
        let code = retry.error.map(|e| e.code());
        assert_eq!(code, Some(ErrorCode::InvalidTransition));
    }

    #[tokio::test]
    async fn test_zero_deadline_disables_timeout() {
        let probe = Arc::new(Probe::default());
        let cell = cell_with(Arc::clone(&probe) as Arc<dyn Lifecycle>);

        let report = cell.start(Some(Duration::ZERO)).await;
        assert!(report.ok());
        assert_eq!(cell.state(), LifecycleState::Started);
    }
}
