use thiserror::Error;

use rflow_core::ReplayError;
use rflow_domain::FlowParseError;

/// Top-level application error: everything the CLI can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("flow document: {0}")]
    Parse(#[from] FlowParseError),
    #[error("replay: {0}")]
    Replay(#[from] ReplayError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
