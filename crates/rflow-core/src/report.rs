//! Per-step results and the run report (per-run only, never persisted).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::session::SessionError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Opaque payload returned by the session.
    Success(Value),
    Failed(SessionError),
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Success(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step_index: usize,
    pub command: String,
    pub raw_input: String,
    pub outcome: StepOutcome,
    pub fingerprint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    pub replay_id: Uuid,
    pub plan_hash: String,
    /// One entry per executed step, in execution order. Under fail-fast
    /// this may be shorter than the plan.
    pub results: Vec<StepResult>,
    /// Index of the failing step that aborted the run, if any.
    pub aborted_at: Option<usize>,
    /// Aggregate fingerprint; only present when the run was not aborted.
    pub replay_fingerprint: Option<String>,
}

impl ReplayReport {
    pub fn succeeded(&self) -> bool {
        self.aborted_at.is_none() && self.results.iter().all(|r| r.outcome.is_success())
    }

    pub fn failures(&self) -> Vec<&StepResult> {
        self.results
            .iter()
            .filter(|r| !r.outcome.is_success())
            .collect()
    }

    /// Success payload of the step at `index`, if it ran and succeeded.
    pub fn outcome_of(&self, index: usize) -> Option<&Value> {
        self.results.get(index).and_then(|r| match &r.outcome {
            StepOutcome::Success(v) => Some(v),
            StepOutcome::Failed(_) => None,
        })
    }
}
