//! Application configuration.
//! Loads environment variables (.env) once and exposes an immutable
//! structure (`CONFIG`) consumed by the CLI.

use once_cell::sync::Lazy;
use std::env;

use rflow_core::FailurePolicy;

pub struct AppConfig {
    /// Base URL of the analytics server, when replaying remotely.
    pub endpoint: Option<String>,
    /// Default failure policy; the CLI flag overrides it.
    pub fail_policy: FailurePolicy,
}

/// Lazily evaluated global configuration, read once per process.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    let _ = dotenvy::dotenv();
    let endpoint = env::var("FLOW_ENDPOINT").ok().filter(|s| !s.is_empty());
    let fail_policy = env::var("FLOW_FAIL_POLICY")
        .ok()
        .and_then(|v| FailurePolicy::parse(&v))
        .unwrap_or_default();
    AppConfig { endpoint, fail_policy }
});
