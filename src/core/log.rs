use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Only events from this crate are emitted.
const APP_TARGET: &str = "fintrack";

fn app_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    }
}

fn app_targets(verbose: bool) -> Targets {
    Targets::new().with_target(APP_TARGET, app_level(verbose))
}

/// Installs the global subscriber. Output goes to stderr so the dashboard
/// tables on stdout stay clean.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(app_level(verbose).to_string()));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .without_time()
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .with(app_targets(verbose))
        .with(env_filter)
        .init();
}
