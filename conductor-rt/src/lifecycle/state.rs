//! Component lifecycle states and the allowed-transition table.

// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use serde::Serialize;

// Layer 3: Internal module imports
// (none)

/// Component state in the lifecycle state machine.
///
/// # State Transitions
///
/// ```text
/// Created ──> Started ──> Stopped ──> Destroyed
///    │           ┌──────────┘ │
///    │           └──> Started │
///    └────────────────────────┴──> Destroyed
/// ```
///
/// Any transition not shown above is rejected before its hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Component has been constructed but not started.
    Created,

    /// Component is running.
    Started,

    /// Component was stopped and may be restarted or destroyed.
    Stopped,

    /// Component has been torn down. Terminal.
    Destroyed,
}

impl LifecycleState {
    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::Started)
                | (Self::Created, Self::Destroyed)
                | (Self::Started, Self::Stopped)
                | (Self::Stopped, Self::Started)
                | (Self::Stopped, Self::Destroyed)
        )
    }

    /// Whether this state admits no further transitions.
    pub fn is_terminal(self) -> bool {
        self == Self::Destroyed
    }
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::Created
    }
}

impl Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Started => f.write_str("started"),
            Self::Stopped => f.write_str("stopped"),
            Self::Destroyed => f.write_str("destroyed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(LifecycleState::Created.can_transition_to(LifecycleState::Started));
        assert!(LifecycleState::Created.can_transition_to(LifecycleState::Destroyed));
        assert!(LifecycleState::Started.can_transition_to(LifecycleState::Stopped));
        assert!(LifecycleState::Stopped.can_transition_to(LifecycleState::Started));
        assert!(LifecycleState::Stopped.can_transition_to(LifecycleState::Destroyed));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!LifecycleState::Created.can_transition_to(LifecycleState::Stopped));
        assert!(!LifecycleState::Started.can_transition_to(LifecycleState::Started));
        assert!(!LifecycleState::Started.can_transition_to(LifecycleState::Destroyed));
        assert!(!LifecycleState::Destroyed.can_transition_to(LifecycleState::Started));
        assert!(!LifecycleState::Destroyed.can_transition_to(LifecycleState::Created));
    }

    #[test]
    fn test_terminal_state() {
        assert!(LifecycleState::Destroyed.is_terminal());
        assert!(!LifecycleState::Created.is_terminal());
        assert!(!LifecycleState::Started.is_terminal());
        assert!(!LifecycleState::Stopped.is_terminal());
    }

    #[test]
    fn test_default_is_created() {
        assert_eq!(LifecycleState::default(), LifecycleState::Created);
    }

    #[test]
    fn test_display() {
        assert_eq!(LifecycleState::Created.to_string(), "created");
        assert_eq!(LifecycleState::Destroyed.to_string(), "destroyed");
    }
}
