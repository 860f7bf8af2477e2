//! Tracing initialization (§4.K "ambient stack"). A single stdout subscriber,
//! env-filtered, matching the container-mode branch of the house logging
//! convention — this binary has no daemon mode, so there is no file-rotation
//! branch to carry over.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber. `level_override` (from
/// `run --log-level`) takes precedence over `RUST_LOG`; absent both, falls
/// back to `info`.
pub fn init_tracing(level_override: Option<&str>) {
    let env_filter = match level_override {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}
