use tracing_subscriber::{EnvFilter, fmt};

/// Default filter when neither `RUST_LOG` nor `-v` is given.
pub const DEFAULT_FILTER: &str = "meal_optimizer_rs=info";

/// Filter directive for a `-v` count.
pub fn filter_for(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        1 => EnvFilter::new("meal_optimizer_rs=debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Install the stderr subscriber. Later calls are no-ops.
pub fn init(verbose: u8) {
    let _ = fmt()
        .with_env_filter(filter_for(verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
