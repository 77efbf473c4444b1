//! Tracing subscriber setup: stdout, `combined.log` and `error.log`.
//!
//! `RUST_LOG` wins when set; otherwise the configured level is used. File
//! sinks go through `tracing-appender`'s non-blocking writer and rotate by
//! size (see [`RotatingFile`]).

mod rotating;

pub use rotating::RotatingFile;

use std::backtrace::Backtrace;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;
use crate::error::ServerError;

pub const COMBINED_LOG: &str = "combined.log";
pub const ERROR_LOG: &str = "error.log";

/// Keeps the background log writers alive. Drop it last so buffered lines
/// are flushed.
#[must_use = "dropping the guard stops the log writers"]
pub struct LogGuard {
    _guards: Vec<WorkerGuard>,
}

/// Map a configured level name to an `EnvFilter` directive.
///
/// Accepts the usual `tracing` levels plus the npm-style names `http`,
/// `verbose` (both `debug`) and `silly` (`trace`). Unknown names yield `None`.
pub fn level_directive(level: &str) -> Option<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "error" => Some("error"),
        "warn" | "warning" => Some("warn"),
        "info" => Some("info"),
        "http" | "verbose" | "debug" => Some("debug"),
        "silly" | "trace" => Some("trace"),
        "off" => Some("off"),
        _ => None,
    }
}

/// Install the global subscriber and the panic hook.
pub fn init(config: &LoggingConfig) -> Result<LogGuard, ServerError> {
    std::fs::create_dir_all(&config.dir)?;

    let max_bytes = config.max_size_bytes();
    let combined = RotatingFile::open(config.dir.join(COMBINED_LOG), max_bytes, config.max_files)?;
    let errors = RotatingFile::open(config.dir.join(ERROR_LOG), max_bytes, config.max_files)?;

    let (stdout, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let (combined, combined_guard) = tracing_appender::non_blocking(combined);
    let (errors, errors_guard) = tracing_appender::non_blocking(errors);

    let known_level = level_directive(&config.level);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(known_level.unwrap_or("info")));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(combined),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(errors)
                .with_filter(LevelFilter::ERROR),
        )
        .try_init()
        .map_err(|e| ServerError::Logging(e.to_string()))?;

    if known_level.is_none() {
        tracing::warn!(level = %config.level, "unknown log level, using info");
    }

    install_panic_hook();

    tracing::info!(
        dir = %config.dir.display(),
        max_bytes,
        max_files = config.max_files,
        "logging initialised"
    );

    Ok(LogGuard {
        _guards: vec![stdout_guard, combined_guard, errors_guard],
    })
}

/// Route panics through `tracing` so they reach `error.log` with a backtrace.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let payload = info.payload();
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            *s
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.as_str()
        } else {
            "unknown panic payload"
        };
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_default();

        tracing::error!(
            panic = message,
            location = %location,
            backtrace = %Backtrace::force_capture(),
            "panic"
        );
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(level_directive("info"), Some("info"));
        assert_eq!(level_directive("WARN"), Some("warn"));
        assert_eq!(level_directive("verbose"), Some("debug"));
        assert_eq!(level_directive("http"), Some("debug"));
        assert_eq!(level_directive("silly"), Some("trace"));
        assert_eq!(level_directive("loud"), None);
    }
}
