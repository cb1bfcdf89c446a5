use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Log levels for the crate and for the HTTP stack underneath it.
fn level_filters(verbosity: u8) -> (LevelFilter, LevelFilter) {
    match verbosity {
        0 => (LevelFilter::OFF, LevelFilter::OFF),
        1 => (LevelFilter::DEBUG, LevelFilter::OFF),
        _ => (LevelFilter::TRACE, LevelFilter::DEBUG),
    }
}

/// Quiet by default; `RUST_LOG` still narrows what `-v` lets through.
pub fn init_logging(verbosity: u8) {
    let (app_level, http_level) = level_filters(verbosity);
    let targets = Targets::new()
        .with_target("kyat", app_level)
        .with_target("reqwest", http_level)
        .with_target("hyper_util", http_level);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(app_level.max(http_level).to_string()));

    // stderr keeps stdout free for rates and conversions
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_target(verbosity > 1)
                .with_writer(std::io::stderr),
        )
        .with(targets)
        .with(env_filter)
        .init();
}
