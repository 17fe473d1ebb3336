//! Canonical error codes and the read-only message map.

// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::str::FromStr;

// Layer 2: Third-party crate imports
use serde::Serialize;

// Layer 3: Internal module imports
use crate::telemetry::Severity;

/// Stable error codes for every failure this crate can raise.
///
/// The code string (`ORK1005`, ...) is the stable contract consumers may
/// match on; message prose is not. Codes `ORK1010`–`ORK1012` name the
/// asynchronous-provider registration failures of platforms where providers
/// can be declared `async`; in this crate provider synchrony is enforced by
/// the type system, so they remain reserved vocabulary in the message map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    /// Container already destroyed (ORK1005)
    ContainerDestroyed,
    /// No provider registered for the requested token (ORK1006)
    MissingProvider,
    /// Duplicate registration or invalid provider (ORK1007)
    DuplicateRegistration,
    /// Dependency references a token absent from the graph (ORK1008)
    UnknownDependency,
    /// Cycle detected in the dependency graph (ORK1009)
    CycleDetected,
    /// Value provider resolved to a pending computation (ORK1010)
    AsyncValue,
    /// Factory provider is asynchronous (ORK1011)
    AsyncFactory,
    /// Class provider constructs asynchronously (ORK1012)
    AsyncClass,
    /// Aggregate failure during start (ORK1013)
    StartFailed,
    /// Aggregate failure during stop (ORK1014)
    StopFailed,
    /// Aggregate failure during container teardown (ORK1016)
    ContainerTeardownFailed,
    /// Aggregate failure during destroy (ORK1017)
    DestroyFailed,
    /// Requested lifecycle transition is not allowed (ORK1020)
    InvalidTransition,
    /// Lifecycle hook exceeded its deadline (ORK1021)
    HookTimeout,
    /// Lifecycle hook returned an error or panicked (ORK1022)
    HookFailed,
    /// Circular dependency detected during resolution (ORK1030)
    ResolutionCycle,
    /// Internal invariant violated (ORK1099)
    Internal,
}

/// Message map entry: default severity plus message template for a code.
#[derive(Debug, Clone, Copy)]
pub struct MessageSpec {
    /// Severity at which the code is logged by default
    pub severity: Severity,
    /// Human-readable message template
    pub template: &'static str,
}

impl ErrorCode {
    /// Stable code string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContainerDestroyed => "ORK1005",
            Self::MissingProvider => "ORK1006",
            Self::DuplicateRegistration => "ORK1007",
            Self::UnknownDependency => "ORK1008",
            Self::CycleDetected => "ORK1009",
            Self::AsyncValue => "ORK1010",
            Self::AsyncFactory => "ORK1011",
            Self::AsyncClass => "ORK1012",
            Self::StartFailed => "ORK1013",
            Self::StopFailed => "ORK1014",
            Self::ContainerTeardownFailed => "ORK1016",
            Self::DestroyFailed => "ORK1017",
            Self::InvalidTransition => "ORK1020",
            Self::HookTimeout => "ORK1021",
            Self::HookFailed => "ORK1022",
            Self::ResolutionCycle => "ORK1030",
            Self::Internal => "ORK1099",
        }
    }

    /// Message map entry for this code.
    pub fn message_spec(&self) -> MessageSpec {
        match self {
            Self::ContainerDestroyed => MessageSpec {
                severity: Severity::Error,
                template: "container has already been destroyed",
            },
            Self::MissingProvider => MessageSpec {
                severity: Severity::Error,
                template: "no provider registered for token",
            },
            Self::DuplicateRegistration => MessageSpec {
                severity: Severity::Error,
                template: "duplicate registration or invalid provider",
            },
            Self::UnknownDependency => MessageSpec {
                severity: Severity::Error,
                template: "dependency references an unknown token",
            },
            Self::CycleDetected => MessageSpec {
                severity: Severity::Error,
                template: "cycle detected in dependency graph",
            },
            Self::AsyncValue => MessageSpec {
                severity: Severity::Error,
                template: "value provider must not be a pending computation",
            },
            Self::AsyncFactory => MessageSpec {
                severity: Severity::Error,
                template: "factory provider must construct synchronously",
            },
            Self::AsyncClass => MessageSpec {
                severity: Severity::Error,
                template: "class provider must construct synchronously",
            },
            Self::StartFailed => MessageSpec {
                severity: Severity::Error,
                template: "one or more components failed to start",
            },
            Self::StopFailed => MessageSpec {
                severity: Severity::Error,
                template: "one or more components failed to stop",
            },
            Self::ContainerTeardownFailed => MessageSpec {
                severity: Severity::Error,
                template: "one or more components failed during container teardown",
            },
            Self::DestroyFailed => MessageSpec {
                severity: Severity::Error,
                template: "one or more components failed to destroy",
            },
            Self::InvalidTransition => MessageSpec {
                severity: Severity::Error,
                template: "invalid lifecycle transition",
            },
            Self::HookTimeout => MessageSpec {
                severity: Severity::Warning,
                template: "lifecycle hook timed out",
            },
            Self::HookFailed => MessageSpec {
                severity: Severity::Error,
                template: "lifecycle hook failed",
            },
            Self::ResolutionCycle => MessageSpec {
                severity: Severity::Error,
                template: "circular dependency detected during resolution",
            },
            Self::Internal => MessageSpec {
                severity: Severity::Critical,
                template: "internal invariant violated",
            },
        }
    }

    /// Whether this code denotes a multi-component aggregate.
    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            Self::StartFailed | Self::StopFailed | Self::ContainerTeardownFailed | Self::DestroyFailed
        )
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORK1005" => Ok(Self::ContainerDestroyed),
            "ORK1006" => Ok(Self::MissingProvider),
            "ORK1007" => Ok(Self::DuplicateRegistration),
            "ORK1008" => Ok(Self::UnknownDependency),
            "ORK1009" => Ok(Self::CycleDetected),
            "ORK1010" => Ok(Self::AsyncValue),
            "ORK1011" => Ok(Self::AsyncFactory),
            "ORK1012" => Ok(Self::AsyncClass),
            "ORK1013" => Ok(Self::StartFailed),
            "ORK1014" => Ok(Self::StopFailed),
            "ORK1016" => Ok(Self::ContainerTeardownFailed),
            "ORK1017" => Ok(Self::DestroyFailed),
            "ORK1020" => Ok(Self::InvalidTransition),
            "ORK1021" => Ok(Self::HookTimeout),
            "ORK1022" => Ok(Self::HookFailed),
            "ORK1030" => Ok(Self::ResolutionCycle),
            "ORK1099" => Ok(Self::Internal),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CODES: &[ErrorCode] = &[
        ErrorCode::ContainerDestroyed,
        ErrorCode::MissingProvider,
        ErrorCode::DuplicateRegistration,
        ErrorCode::UnknownDependency,
        ErrorCode::CycleDetected,
        ErrorCode::AsyncValue,
        ErrorCode::AsyncFactory,
        ErrorCode::AsyncClass,
        ErrorCode::StartFailed,
        ErrorCode::StopFailed,
        ErrorCode::ContainerTeardownFailed,
        ErrorCode::DestroyFailed,
        ErrorCode::InvalidTransition,
        ErrorCode::HookTimeout,
        ErrorCode::HookFailed,
        ErrorCode::ResolutionCycle,
        ErrorCode::Internal,
    ];

    #[test]
    fn test_code_strings_are_stable() {
        assert_eq!(ErrorCode::ContainerDestroyed.as_str(), "ORK1005");
        assert_eq!(ErrorCode::MissingProvider.as_str(), "ORK1006");
        assert_eq!(ErrorCode::DuplicateRegistration.as_str(), "ORK1007");
        assert_eq!(ErrorCode::UnknownDependency.as_str(), "ORK1008");
        assert_eq!(ErrorCode::CycleDetected.as_str(), "ORK1009");
        assert_eq!(ErrorCode::AsyncValue.as_str(), "ORK1010");
        assert_eq!(ErrorCode::AsyncFactory.as_str(), "ORK1011");
        assert_eq!(ErrorCode::AsyncClass.as_str(), "ORK1012");
        assert_eq!(ErrorCode::StartFailed.as_str(), "ORK1013");
        assert_eq!(ErrorCode::StopFailed.as_str(), "ORK1014");
        assert_eq!(ErrorCode::ContainerTeardownFailed.as_str(), "ORK1016");
        assert_eq!(ErrorCode::DestroyFailed.as_str(), "ORK1017");
        assert_eq!(ErrorCode::InvalidTransition.as_str(), "ORK1020");
        assert_eq!(ErrorCode::HookTimeout.as_str(), "ORK1021");
        assert_eq!(ErrorCode::HookFailed.as_str(), "ORK1022");
        assert_eq!(ErrorCode::ResolutionCycle.as_str(), "ORK1030");
        assert_eq!(ErrorCode::Internal.as_str(), "ORK1099");
    }

    #[test]
    fn test_code_roundtrip_through_from_str() {
        for code in ALL_CODES {
            let parsed: ErrorCode = code
                .as_str()
                .parse()
                .unwrap_or(ErrorCode::Internal);
            assert_eq!(parsed, *code);
        }
    }

    #[test]
    fn test_unknown_code_string_is_rejected() {
        assert!("ORK9999".parse::<ErrorCode>().is_err());
        assert!("not a code".parse::<ErrorCode>().is_err());
    }

    #[test]
    fn test_every_code_has_a_message() {
        for code in ALL_CODES {
            assert!(!code.message_spec().template.is_empty());
        }
    }

    #[test]
    fn test_aggregate_codes() {
        assert!(ErrorCode::StartFailed.is_aggregate());
        assert!(ErrorCode::StopFailed.is_aggregate());
        assert!(ErrorCode::DestroyFailed.is_aggregate());
        assert!(ErrorCode::ContainerTeardownFailed.is_aggregate());
        assert!(!ErrorCode::MissingProvider.is_aggregate());
        assert!(!ErrorCode::HookTimeout.is_aggregate());
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(format!("{}", ErrorCode::CycleDetected), "ORK1009");
    }
}
