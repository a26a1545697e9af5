#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CHECK_MATRIX_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

/// Logs go to stderr; stdout carries protocol frames only.
pub(crate) fn init_logging(config_directive: Option<&str>) {
    let directive = std::env::var(LOG_ENV)
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .filter(|value| !value.trim().is_empty())
        .or_else(|| config_directive.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
