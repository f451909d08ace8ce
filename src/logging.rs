use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`
///
/// Does nothing if a global subscriber is already set, so test harnesses and
/// binaries can both call it.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
