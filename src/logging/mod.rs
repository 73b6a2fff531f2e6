//! Tracing subscriber initialization.
//!
//! Diagnostics (skipped nodes, ceilings hit, truncated results) are
//! tracing events; the CLI driver writes them to stderr so JSON output
//! on stdout stays clean.

/// Initialize the tracing subscriber with stderr logging.
///
/// Respects RUST_LOG environment variable, defaults to "warn" level.
///
/// # Returns
/// * `Ok(())` if initialization succeeded
/// * `Err(msg)` if the subscriber was already initialized
pub fn init() -> Result<(), String> {
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| format!("Failed to initialize tracing subscriber: {}", e))
}
