//! Subscriber setup for the `revise` binary.
//!
//! Two sinks are installed. Stderr shows warnings unless `RUST_LOG` asks for
//! more, e.g. `RUST_LOG=revise::history=debug` to follow undo/redo moves or
//! `RUST_LOG=revise::notify=trace` for observer delivery. A daily rolling
//! `revise.log` in the logs directory always records at debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE: &str = "revise.log";

/// Install the global subscriber. Call once, before any other work.
pub fn init() {
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(stderr_filter);

    // Without a usable logs dir only stderr logging runs
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(dir) => Some(
            fmt::layer()
                .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_filter(EnvFilter::new("debug")),
        ),
        Err(e) => {
            eprintln!("revise: file logging disabled: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
}
