//! Orchestrator configuration with sensible defaults.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::diagnostic::Phase;
use crate::telemetry::TelemetryConfig;
use crate::util::opt_duration_ms_serde;

/// Per-phase timeout table.
///
/// `None` means "not set here": a node-level `None` falls back to the
/// orchestrator default for that phase. An explicit zero disables the
/// timeout outright, overriding any default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    /// Deadline for the start phase (`on_create` + `on_start`)
    #[serde(with = "opt_duration_ms_serde")]
    pub on_start: Option<Duration>,

    /// Deadline for the stop phase
    #[serde(with = "opt_duration_ms_serde")]
    pub on_stop: Option<Duration>,

    /// Deadline for the destroy phase
    #[serde(with = "opt_duration_ms_serde")]
    pub on_destroy: Option<Duration>,
}

impl Timeouts {
    /// No per-phase timeouts set.
    pub fn none() -> Self {
        Self::default()
    }

    /// The same deadline for every phase.
    pub fn uniform(deadline: Duration) -> Self {
        Self {
            on_start: Some(deadline),
            on_stop: Some(deadline),
            on_destroy: Some(deadline),
        }
    }

    /// Deadline entry for one phase.
    pub fn for_phase(&self, phase: Phase) -> Option<Duration> {
        match phase {
            Phase::Start => self.on_start,
            Phase::Stop => self.on_stop,
            Phase::Destroy => self.on_destroy,
        }
    }
}

/// Orchestrator-wide configuration.
///
/// # Examples
///
/// ```rust
/// use conductor_rt::orchestrator::OrchestratorConfig;
/// use std::time::Duration;
///
/// let config = OrchestratorConfig::builder()
///     .with_start_timeout(Duration::from_secs(30))
///     .with_concurrency(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.concurrency, Some(4));
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrchestratorConfig {
    /// Default per-phase deadlines, overridable per node
    pub timeouts: Timeouts,

    /// Maximum concurrent jobs per layer; `None` runs the whole layer
    pub concurrency: Option<usize>,

    /// Telemetry collection settings
    pub telemetry: TelemetryConfig,
}

impl OrchestratorConfig {
    /// Create a configuration builder.
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::default()
    }

    /// Validate configuration values.
    ///
    /// Returns `Err` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency == Some(0) {
            return Err("concurrency must be > 0 when set".to_owned());
        }
        Ok(())
    }
}

/// Builder for [`OrchestratorConfig`] with a fluent API.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfigBuilder {
    timeouts: Timeouts,
    concurrency: Option<usize>,
    telemetry: TelemetryConfig,
}

impl OrchestratorConfigBuilder {
    /// Set the full per-phase timeout table.
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the default start-phase deadline.
    pub fn with_start_timeout(mut self, deadline: Duration) -> Self {
        self.timeouts.on_start = Some(deadline);
        self
    }

    /// Set the default stop-phase deadline.
    pub fn with_stop_timeout(mut self, deadline: Duration) -> Self {
        self.timeouts.on_stop = Some(deadline);
        self
    }

    /// Set the default destroy-phase deadline.
    pub fn with_destroy_timeout(mut self, deadline: Duration) -> Self {
        self.timeouts.on_destroy = Some(deadline);
        self
    }

    /// Set the per-layer concurrency limit.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Set the telemetry configuration.
    pub fn with_telemetry(mut self, telemetry: TelemetryConfig) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<OrchestratorConfig, String> {
        let config = OrchestratorConfig {
            timeouts: self.timeouts,
            concurrency: self.concurrency,
            telemetry: self.telemetry,
        };
        config.validate()?;
        Ok(config)
    }
}
