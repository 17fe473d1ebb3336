//! Code-keyed log emission through `tracing`.
//!
//! Keys that parse as an [`ErrorCode`] are resolved through the message map
//! (severity + template); anything else is logged verbatim at info level.
//! Emission is best-effort by construction: `tracing` subscribers run behind
//! the facade and cannot raise back into the caller.

// Layer 1: Standard library imports
use std::str::FromStr;

// Layer 2: Third-party crate imports
use tracing::{debug, error as trace_error, info, trace, warn};

// Layer 3: Internal module imports
use super::code::ErrorCode;
use super::error::OrchestratorError;
use crate::telemetry::Severity;

/// Log a message key, resolving it through the message map.
pub fn log(key: &str) {
    match ErrorCode::from_str(key) {
        Ok(code) => {
            let spec = code.message_spec();
            dispatch(spec.severity, Some(code.as_str()), spec.template);
        }
        Err(()) => dispatch(Severity::Info, None, key),
    }
}

/// Log an already-built error at its code's severity, details included.
///
/// Never raises; intended for failure paths that must keep moving.
pub fn log_error(err: &OrchestratorError) {
    let severity = err.code().message_spec().severity;
    dispatch_error(severity, err);

    for detail in err.details() {
        trace_error!(
            code = err.code().as_str(),
            token = %detail.token,
            phase = %detail.phase,
            context = %detail.context,
            timed_out = detail.timed_out,
            duration_ms = detail.duration_ms(),
            cause = %detail.error,
            "component failure"
        );
    }
}

fn dispatch(severity: Severity, code: Option<&str>, message: &str) {
    match severity {
        Severity::Trace => trace!(code, "{message}"),
        Severity::Debug => debug!(code, "{message}"),
        Severity::Info => info!(code, "{message}"),
        Severity::Warning => warn!(code, "{message}"),
        Severity::Error | Severity::Critical => trace_error!(code, "{message}"),
    }
}

fn dispatch_error(severity: Severity, err: &OrchestratorError) {
    let code = err.code().as_str();
    let scope = err.context().and_then(|c| c.scope.as_deref());
    let token = err.context().and_then(|c| c.token.as_deref());
    match severity {
        Severity::Trace => trace!(code, scope, token, "{err}"),
        Severity::Debug => debug!(code, scope, token, "{err}"),
        Severity::Info => info!(code, scope, token, "{err}"),
        Severity::Warning => warn!(code, scope, token, "{err}"),
        Severity::Error | Severity::Critical => trace_error!(code, scope, token, "{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::error::ErrorContext;

    #[test]
    fn test_log_accepts_known_code() {
        // Resolves through the message map without panicking.
        log("ORK1013");
    }

    #[test]
    fn test_log_accepts_literal_message() {
        log("orchestrator ready");
    }

    #[test]
    fn test_log_error_with_context_and_details() {
        let err = OrchestratorError::aggregate(
            ErrorCode::StartFailed,
            vec![OrchestratorError::new(ErrorCode::HookFailed).into()],
        )
        .with_context(ErrorContext::new().scope("root"));

        log_error(&err);
    }
}
