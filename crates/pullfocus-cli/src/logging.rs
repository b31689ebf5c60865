use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Diagnostics go to stderr so stdout stays
/// parseable JSON.
///
/// `RUST_LOG` wins over `default_filter`.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    // no-op if a subscriber is already set
    let _ = subscriber.try_init();
}
