use std::fs;

use groupwise_config::LogConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "groupwise.json";

/// Console filter used when `RUST_LOG` is unset.
pub fn default_filter(log_level: &str) -> String {
    format!("{}={}", env!("CARGO_CRATE_NAME"), log_level)
}

/// Installs the global subscriber.
///
/// Console output is compact and goes to stderr so command output on stdout
/// stays clean. When `log_dir` is set, structured JSON is also written to a
/// daily-rolling file; keep the returned guard alive until exit so buffered
/// lines are flushed.
pub fn init_tracing(config: &LogConfig) -> Option<WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.log_level)));

    let console_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_filter(console_filter);

    let Some(log_dir) = config.log_dir.as_ref() else {
        tracing_subscriber::registry().with(console_layer).init();
        return None;
    };

    if let Err(e) = fs::create_dir_all(log_dir) {
        tracing_subscriber::registry().with(console_layer).init();
        tracing::warn!(
            log_dir = %log_dir.display(),
            error = %e,
            "Could not create log directory, file logging disabled"
        );
        return None;
    }

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let json_layer = fmt::layer()
        .json()
        .with_writer(writer)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new(default_filter(&config.log_level)));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .init();

    Some(guard)
}
