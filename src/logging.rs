use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "regionguard=info";

/// Installs a `tracing` fmt subscriber filtered by `RUST_LOG`, falling back to
/// `regionguard=info`. Returns false if a global subscriber already exists.
pub fn init() -> bool {
    init_with_filter(DEFAULT_FILTER)
}

pub fn init_with_filter(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
