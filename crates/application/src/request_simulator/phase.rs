use serde::Serialize;

use validash_core::{AppError, AppResult};
use validash_domain::LogStatus;

/// Lifecycle state of one simulated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "status", rename_all = "snake_case")]
pub enum SimulationPhase {
    /// Not started.
    Idle,
    /// Checking the key shape.
    Validating,
    /// Waiting out the artificial round-trip latency.
    Simulating,
    /// Finished with a recorded outcome.
    Resolved(LogStatus),
    /// Abandoned by the caller before resolving.
    Cancelled,
}

impl SimulationPhase {
    /// Returns whether no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Cancelled)
    }

    /// Returns whether moving from this phase to `next` is legal.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (*self, next),
            (Self::Idle, Self::Validating)
                | (Self::Validating, Self::Simulating)
                | (Self::Validating, Self::Resolved(LogStatus::Error))
                | (
                    Self::Simulating,
                    Self::Resolved(LogStatus::Success | LogStatus::Error)
                )
                | (Self::Simulating, Self::Cancelled)
        )
    }

    /// Validates and performs a transition.
    pub fn transition_to(self, next: Self) -> AppResult<Self> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::Conflict(format!(
                "illegal simulation transition {self:?} -> {next:?}"
            )))
        }
    }
}

/// Ordered record of the phases one invocation went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct PhaseTrace {
    phases: Vec<SimulationPhase>,
}

impl PhaseTrace {
    pub(super) fn start() -> Self {
        Self {
            phases: vec![SimulationPhase::Idle],
        }
    }

    pub(super) fn current(&self) -> SimulationPhase {
        self.phases
            .last()
            .copied()
            .unwrap_or(SimulationPhase::Idle)
    }

    pub(super) fn advance(&mut self, next: SimulationPhase) -> AppResult<()> {
        let next = self.current().transition_to(next)?;
        self.phases.push(next);
        Ok(())
    }

    pub(super) fn into_phases(self) -> Vec<SimulationPhase> {
        self.phases
    }
}
