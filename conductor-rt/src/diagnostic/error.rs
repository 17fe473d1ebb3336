//! The typed error raised by every fallible operation in this crate.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::Serialize;
use thiserror::Error;

// Layer 3: Internal module imports
use super::code::ErrorCode;
use super::detail::{FailureDetail, Phase};

/// Boxed error type accepted from lifecycle hooks and factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Structured context attached to an error.
///
/// All fields are optional; producers fill in what they know at the raise
/// site.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrorContext {
    /// Container or orchestrator scope name
    pub scope: Option<String>,
    /// Description of the token involved
    pub token: Option<String>,
    /// Lifecycle phase in flight
    pub phase: Option<Phase>,
    /// Measured duration in milliseconds, when timing is relevant
    pub duration_ms: Option<u64>,
}

impl ErrorContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scope name.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the token description.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the lifecycle phase.
    pub fn phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Set the measured duration.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX));
        self
    }
}

/// Error raised by containers, the lifecycle kernel, and the orchestrator.
///
/// Carries a stable [`ErrorCode`], a human message, optional structured
/// context, and — for aggregates — one [`FailureDetail`] per affected
/// component. Consumers match on [`code`](Self::code); message prose is not
/// part of the stable contract.
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct OrchestratorError {
    code: ErrorCode,
    message: String,
    help_url: Option<String>,
    context: Option<ErrorContext>,
    details: Vec<FailureDetail>,
    #[source]
    source: Option<BoxError>,
}

impl OrchestratorError {
    /// Build an error with the code's default message.
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.message_spec().template.to_owned(),
            help_url: None,
            context: None,
            details: Vec::new(),
            source: None,
        }
    }

    /// Build an error with a custom message.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::new(code)
        }
    }

    /// Build an aggregate error from per-component detail records.
    ///
    /// Bare errors can be folded into details via
    /// `FailureDetail::from(error)`, which applies the neutral defaults
    /// (start phase, normal context, zero duration).
    pub fn aggregate(code: ErrorCode, details: Vec<FailureDetail>) -> Self {
        let mut err = Self::new(code);
        err.message = format!("{} ({} failed)", err.message, details.len());
        err.details = details;
        err
    }

    /// Attach structured context.
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Attach a help URL.
    pub fn with_help_url(mut self, url: impl Into<String>) -> Self {
        self.help_url = Some(url.into());
        self
    }

    /// Attach the causing error.
    pub fn with_source(mut self, source: BoxError) -> Self {
        self.source = Some(source);
        self
    }

    /// Stable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Error name, distinguishing aggregates from single failures.
    pub fn name(&self) -> &'static str {
        if self.is_aggregate() {
            "AggregateLifecycleError"
        } else {
            "OrchestratorError"
        }
    }

    /// Help URL, when one was attached.
    pub fn help_url(&self) -> Option<&str> {
        self.help_url.as_deref()
    }

    /// Structured context, when attached.
    pub fn context(&self) -> Option<&ErrorContext> {
        self.context.as_ref()
    }

    /// Per-component failure records (empty for non-aggregates).
    pub fn details(&self) -> &[FailureDetail] {
        &self.details
    }

    /// Causing errors, parallel to [`details`](Self::details).
    pub fn errors(&self) -> impl Iterator<Item = &OrchestratorError> {
        self.details.iter().map(|d| &d.error)
    }

    /// Whether this error bundles per-component failures.
    pub fn is_aggregate(&self) -> bool {
        !self.details.is_empty()
    }

    /// Consume the error, yielding its detail records.
    pub fn into_details(self) -> Vec<FailureDetail> {
        self.details
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::detail::FailureContext;

    fn sample_detail(token: &str) -> FailureDetail {
        FailureDetail::new(
            token,
            Phase::Start,
            FailureContext::Normal,
            false,
            Duration::from_millis(5),
            OrchestratorError::new(ErrorCode::HookFailed),
        )
    }

    #[test]
    fn test_new_uses_template_message() {
        let err = OrchestratorError::new(ErrorCode::MissingProvider);
        assert_eq!(err.code(), ErrorCode::MissingProvider);
        assert_eq!(err.message(), "no provider registered for token");
        assert!(!err.is_aggregate());
    }

    #[test]
    fn test_display_includes_code() {
        let err = OrchestratorError::new(ErrorCode::ContainerDestroyed);
        let rendered = err.to_string();
        assert!(rendered.contains("ORK1005"));
        assert!(rendered.contains("destroyed"));
    }

    #[test]
    fn test_aggregate_details_and_errors_are_parallel() {
        let err = OrchestratorError::aggregate(
            ErrorCode::StartFailed,
            vec![sample_detail("a"), sample_detail("b")],
        );

        assert!(err.is_aggregate());
        assert_eq!(err.details().len(), 2);
        assert_eq!(err.errors().count(), err.details().len());
        for (detail, cause) in err.details().iter().zip(err.errors()) {
            assert_eq!(detail.error.code(), cause.code());
        }
    }

    #[test]
    fn test_name_distinguishes_aggregates() {
        let single = OrchestratorError::new(ErrorCode::HookFailed);
        assert_eq!(single.name(), "OrchestratorError");

        let aggregate =
            OrchestratorError::aggregate(ErrorCode::StopFailed, vec![sample_detail("a")]);
        assert_eq!(aggregate.name(), "AggregateLifecycleError");
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_context_builder() {
        let err = OrchestratorError::new(ErrorCode::HookTimeout).with_context(
            ErrorContext::new()
                .scope("root")
                .token("database")
                .phase(Phase::Start)
                .duration(Duration::from_millis(50)),
        );

        let ctx = err.context().expect("context should be attached");
        assert_eq!(ctx.scope.as_deref(), Some("root"));
        assert_eq!(ctx.token.as_deref(), Some("database"));
        assert_eq!(ctx.phase, Some(Phase::Start));
        assert_eq!(ctx.duration_ms, Some(50));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let cause: BoxError = "boom".into();
        let err = OrchestratorError::new(ErrorCode::HookFailed).with_source(cause);

        assert!(err.source().is_some());
    }
}
