//! Phase execution results.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::diagnostic::OrchestratorError;

/// Outcome of one hook invocation.
///
/// Durations are measured with a monotonic clock, from the moment the kernel
/// invokes the hook to the moment it observes completion or gives up on the
/// deadline.
#[derive(Debug)]
pub struct PhaseReport {
    /// Measured hook duration
    pub duration: Duration,

    /// Whether the hook exceeded its deadline
    pub timed_out: bool,

    /// Failure, when the phase did not complete
    pub error: Option<OrchestratorError>,
}

impl PhaseReport {
    /// Report for a hook that completed in time.
    pub fn completed(duration: Duration) -> Self {
        Self {
            duration,
            timed_out: false,
            error: None,
        }
    }

    /// Report for a hook that raised.
    pub fn failed(duration: Duration, error: OrchestratorError) -> Self {
        Self {
            duration,
            timed_out: false,
            error: Some(error),
        }
    }

    /// Report for a hook that exceeded its deadline.
    pub fn expired(duration: Duration, error: OrchestratorError) -> Self {
        Self {
            duration,
            timed_out: true,
            error: Some(error),
        }
    }

    /// Report for a phase rejected before any hook ran.
    pub fn rejected(error: OrchestratorError) -> Self {
        Self {
            duration: Duration::ZERO,
            timed_out: false,
            error: Some(error),
        }
    }

    /// Whether the phase completed successfully.
    pub fn ok(&self) -> bool {
        self.error.is_none()
    }

    /// Duration as whole milliseconds.
    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::ErrorCode;

    #[test]
    fn test_completed_report() {
        let report = PhaseReport::completed(Duration::from_millis(12));
        assert!(report.ok());
        assert!(!report.timed_out);
        assert_eq!(report.duration_ms(), 12);
    }

    #[test]
    fn test_failed_report() {
        let report = PhaseReport::failed(
            Duration::from_millis(3),
            OrchestratorError::new(ErrorCode::HookFailed),
        );
        assert!(!report.ok());
        assert!(!report.timed_out);
    }

    #[test]
    fn test_expired_report() {
        let report = PhaseReport::expired(
            Duration::from_millis(50),
            OrchestratorError::new(ErrorCode::HookTimeout),
        );
        assert!(!report.ok());
        assert!(report.timed_out);
    }

    #[test]
    fn test_rejected_report_has_zero_duration() {
        let report =
            PhaseReport::rejected(OrchestratorError::new(ErrorCode::InvalidTransition));
        assert!(!report.ok());
        assert_eq!(report.duration, Duration::ZERO);
    }
}
