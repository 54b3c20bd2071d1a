//! The session boundary.
//!
//! All analytics state (imported files, parsed frames, trained models)
//! lives behind this trait, owned by the remote engine and referenced by
//! name. The harness assumes exclusive use of the session for the duration
//! of a replay and issues exactly one command at a time; `execute` blocks
//! until the remote returns. No retries, no timeouts.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use rflow_domain::Command;

/// Why the remote side failed a command.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionError {
    /// The engine understood the command and refused it (bad arguments,
    /// length mismatch, unsupported operation).
    #[error("command rejected: {message}")]
    Rejected { message: String },
    /// A frame or model referenced by name does not exist on the session.
    #[error("unknown reference: {id}")]
    MissingReference { id: String },
    /// The command never reached the engine, or the connection dropped.
    #[error("transport: {message}")]
    Transport { message: String },
}

/// A stateful analytics session. Implementations hold or proxy all remote
/// state; the success payload is opaque to the harness.
pub trait Session {
    fn execute(&mut self, command: &Command) -> Result<Value, SessionError>;

    /// Short label for logs.
    fn label(&self) -> &str {
        "session"
    }
}
