use thiserror::Error;

/// Harness-side failures. Step failures are not errors at this level: they
/// are recorded in the report and the event trail, per the failure policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("internal: {0}")]
    Internal(String),
}
