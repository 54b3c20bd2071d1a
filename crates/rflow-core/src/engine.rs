//! The replay engine.
//!
//! Strictly sequential: one command is submitted at a time and the engine
//! waits for its result before touching the next, because later commands
//! reference frames and models created by earlier ones purely by name.
//! Every submission and outcome lands in the event store before the next
//! step starts.

use log::{debug, warn};
use serde_json::json;
use uuid::Uuid;

use crate::constants::HARNESS_VERSION;
use crate::errors::ReplayError;
use crate::event::{EventStore, InMemoryEventStore, ReplayEvent, ReplayEventKind};
use crate::hashing::hash_value;
use crate::plan::{PlannedStep, ReplayPlan};
use crate::report::{ReplayReport, StepOutcome, StepResult};
use crate::session::Session;

/// What to do with the rest of the plan after a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop after recording the failing step. Default: later steps depend
    /// by name on state the failed step was supposed to create, so pressing
    /// on mostly manufactures cascading missing-reference failures.
    #[default]
    FailFast,
    /// Record the failure and keep going.
    BestEffort,
}

impl FailurePolicy {
    /// Accepts the spellings used by the CLI and `FLOW_FAIL_POLICY`.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "fail-fast" | "failfast" => Some(FailurePolicy::FailFast),
            "best-effort" | "continue" => Some(FailurePolicy::BestEffort),
            _ => None,
        }
    }
}

pub struct ReplayEngine<E, S>
where
    E: EventStore,
    S: Session,
{
    event_store: E,
    session: S,
    policy: FailurePolicy,
    last_replay_id: Option<Uuid>,
}

impl<S: Session> ReplayEngine<InMemoryEventStore, S> {
    /// Engine with the in-memory event store.
    pub fn new(session: S) -> Self {
        Self::with_stores(InMemoryEventStore::default(), session)
    }
}

impl<E, S> ReplayEngine<E, S>
where
    E: EventStore,
    S: Session,
{
    pub fn with_stores(event_store: E, session: S) -> Self {
        Self {
            event_store,
            session,
            policy: FailurePolicy::default(),
            last_replay_id: None,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    /// Execute the plan against the session, in order, producing one
    /// `StepResult` per executed step. `Err` means the harness itself
    /// broke; step failures are reported in the `ReplayReport`.
    pub fn replay(&mut self, plan: &ReplayPlan) -> Result<ReplayReport, ReplayError> {
        let replay_id = Uuid::new_v4();
        self.last_replay_id = Some(replay_id);
        self.event_store.append_kind(
            replay_id,
            ReplayEventKind::ReplayInitialized {
                plan_hash: plan.plan_hash.clone(),
                step_count: plan.len(),
            },
        );
        debug!(
            "replay {replay_id}: {} step(s) against {}",
            plan.len(),
            self.session.label()
        );

        let mut results: Vec<StepResult> = Vec::with_capacity(plan.len());
        let mut aborted_at = None;

        for step in &plan.steps {
            let command = step.command.name().to_string();
            self.event_store.append_kind(
                replay_id,
                ReplayEventKind::StepStarted {
                    step_index: step.index,
                    command: command.clone(),
                },
            );

            match self.session.execute(&step.command) {
                Ok(payload) => {
                    let outcome_hash = hash_value(&payload);
                    let fingerprint = self.step_fingerprint(plan, step, Some(&outcome_hash));
                    self.event_store.append_kind(
                        replay_id,
                        ReplayEventKind::StepFinished {
                            step_index: step.index,
                            command: command.clone(),
                            outcome_hash,
                            fingerprint: fingerprint.clone(),
                        },
                    );
                    results.push(StepResult {
                        step_index: step.index,
                        command,
                        raw_input: step.raw_input.clone(),
                        outcome: StepOutcome::Success(payload),
                        fingerprint,
                    });
                }
                Err(error) => {
                    warn!("replay {replay_id}: step {} `{command}` failed: {error}", step.index);
                    let fingerprint = self.step_fingerprint(plan, step, None);
                    self.event_store.append_kind(
                        replay_id,
                        ReplayEventKind::StepFailed {
                            step_index: step.index,
                            command: command.clone(),
                            error: error.clone(),
                            fingerprint: fingerprint.clone(),
                        },
                    );
                    results.push(StepResult {
                        step_index: step.index,
                        command,
                        raw_input: step.raw_input.clone(),
                        outcome: StepOutcome::Failed(error),
                        fingerprint,
                    });
                    if self.policy == FailurePolicy::FailFast {
                        aborted_at = Some(step.index);
                        self.event_store.append_kind(
                            replay_id,
                            ReplayEventKind::ReplayAborted { failed_step: step.index },
                        );
                        break;
                    }
                }
            }
        }

        let replay_fingerprint = if aborted_at.is_none() {
            let step_fps: Vec<&str> = results
                .iter()
                .filter(|r| r.outcome.is_success())
                .map(|r| r.fingerprint.as_str())
                .collect();
            let fp = hash_value(&json!({
                "harness_version": HARNESS_VERSION,
                "plan_hash": plan.plan_hash,
                "step_fingerprints": step_fps,
            }));
            self.event_store.append_kind(
                replay_id,
                ReplayEventKind::ReplayCompleted { replay_fingerprint: fp.clone() },
            );
            Some(fp)
        } else {
            None
        };

        Ok(ReplayReport {
            replay_id,
            plan_hash: plan.plan_hash.clone(),
            results,
            aborted_at,
            replay_fingerprint,
        })
    }

    fn step_fingerprint(
        &self,
        plan: &ReplayPlan,
        step: &PlannedStep,
        outcome_hash: Option<&str>,
    ) -> String {
        hash_value(&json!({
            "harness_version": HARNESS_VERSION,
            "plan_hash": plan.plan_hash,
            "step_index": step.index,
            "outcome_hash": outcome_hash,
        }))
    }

    /// Event trail of the most recent replay.
    pub fn events(&self) -> Vec<ReplayEvent> {
        self.last_replay_id
            .map(|id| self.event_store.list(id))
            .unwrap_or_default()
    }

    /// Compact event-kind sequence of the last replay, for assertions and
    /// quick diagnostics: I=initialized, S=started, F=finished, X=failed,
    /// A=aborted, C=completed.
    pub fn event_variants(&self) -> Vec<&'static str> {
        self.events()
            .iter()
            .map(|e| match e.kind {
                ReplayEventKind::ReplayInitialized { .. } => "I",
                ReplayEventKind::StepStarted { .. } => "S",
                ReplayEventKind::StepFinished { .. } => "F",
                ReplayEventKind::StepFailed { .. } => "X",
                ReplayEventKind::ReplayAborted { .. } => "A",
                ReplayEventKind::ReplayCompleted { .. } => "C",
            })
            .collect()
    }
}
