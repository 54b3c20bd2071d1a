//! Versioning constants folded into fingerprints.

/// Bumped whenever the fingerprint recipe or the event contract changes.
pub const HARNESS_VERSION: &str = "rflow-1";
