//! rflow-core: sequential replay engine over a stateful analytics session.
//!
//! Takes a decoded flow document, builds an immutable `ReplayPlan`, and
//! submits each planned command to a `Session` in document order, recording
//! an append-only event trail and producing one `StepResult` per executed
//! step. Failure handling (fail-fast vs best-effort) is configured by the
//! caller; there are no retries.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod plan;
pub mod report;
pub mod session;

pub use engine::{FailurePolicy, ReplayEngine};
pub use errors::ReplayError;
pub use event::{EventStore, InMemoryEventStore, ReplayEvent, ReplayEventKind};
pub use plan::{build_replay_plan, PlannedStep, ReplayPlan};
pub use report::{ReplayReport, StepOutcome, StepResult};
pub use session::{Session, SessionError};
