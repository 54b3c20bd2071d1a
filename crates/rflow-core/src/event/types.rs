//! Replay event kinds and the `ReplayEvent` envelope.
//!
//! Every replay appends to an `EventStore`:
//! - the trail reconstructs what ran, in which order, and what came back;
//! - `ReplayEventKind` is the stable observable contract of the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::SessionError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReplayEventKind {
    /// First event of every replay: fixes the plan hash and step count.
    ReplayInitialized { plan_hash: String, step_count: usize },
    /// A step was submitted to the session. Does not imply success.
    StepStarted { step_index: usize, command: String },
    /// The session accepted the step; payload is recorded by hash only.
    StepFinished {
        step_index: usize,
        command: String,
        outcome_hash: String,
        fingerprint: String,
    },
    /// The session failed the step. What happens next depends on the
    /// configured failure policy.
    StepFailed {
        step_index: usize,
        command: String,
        error: SessionError,
        fingerprint: String,
    },
    /// Fail-fast abort: remaining steps were never submitted.
    ReplayAborted { failed_step: usize },
    /// Closing event carrying the aggregate fingerprint over the
    /// fingerprints of successful steps, in order.
    ReplayCompleted { replay_fingerprint: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayEvent {
    /// Append order within a replay, assigned by the store.
    pub seq: u64,
    pub replay_id: Uuid,
    pub kind: ReplayEventKind,
    /// Wall-clock metadata only; never enters a fingerprint.
    pub ts: DateTime<Utc>,
}
