use std::path::Path;

use miette::{Context, IntoDiagnostic, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};


/// Keeps the non-blocking log file writer alive.
/// Dropping this flushes and stops file logging.
pub struct TracingGuard {
    _file_writer_guard: Option<WorkerGuard>,
}


/// Parses a level filter (e.g. `info` or `digiskr=debug,warn`).
pub fn parse_level_filter(level_filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level_filter)
        .into_diagnostic()
        .wrap_err_with(|| format!("Invalid log level filter: {level_filter}"))
}


/// Initializes console logging and, if `log_file_output_directory` is provided,
/// logging into a daily-rotated `log_file_name` inside that directory.
pub fn initialize_tracing(
    console_level_filter: EnvFilter,
    log_file_level_filter: EnvFilter,
    log_file_output_directory: Option<&Path>,
    log_file_name: &str,
) -> Result<TracingGuard> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_level_filter);

    let Some(log_file_output_directory) = log_file_output_directory else {
        tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .into_diagnostic()
            .wrap_err("Failed to initialize tracing subscriber.")?;

        return Ok(TracingGuard {
            _file_writer_guard: None,
        });
    };


    std::fs::create_dir_all(log_file_output_directory)
        .into_diagnostic()
        .wrap_err_with(|| {
            format!(
                "Failed to create log file directory at {}.",
                log_file_output_directory.display()
            )
        })?;

    let file_appender = tracing_appender::rolling::daily(log_file_output_directory, log_file_name);
    let (non_blocking_file_writer, file_writer_guard) =
        tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file_writer)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_filter(log_file_level_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("Failed to initialize tracing subscriber.")?;


    Ok(TracingGuard {
        _file_writer_guard: Some(file_writer_guard),
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_filters_are_validated() {
        assert!(parse_level_filter("info").is_ok());
        assert!(parse_level_filter("digiskr=debug,warn").is_ok());
        assert!(parse_level_filter("digiskr=loud").is_err());
    }
}
