use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber for the command line tools.
///
/// `RUST_LOG` takes precedence. Otherwise the level is `debug` when `enable_logging` is set,
/// which reports every accepted and rejected transaction, and `info` when it is not.
pub fn init_logging(enable_logging: bool) {
    let default_level = if enable_logging { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Fails only if a subscriber is already installed, which is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
