use std::path::Path;

use miette::{miette, Context, IntoDiagnostic, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};


/// Install the global tracing subscriber: a console layer on stderr and a
/// daily-rotated log file in `log_file_output_directory`, each with its own filter.
///
/// Keep the returned guard alive until exit, otherwise buffered file output is lost.
pub fn initialize_tracing(
    console_level_filter: EnvFilter,
    log_file_level_filter: EnvFilter,
    log_file_output_directory: &Path,
    log_file_name_prefix: &str,
) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_file_output_directory)
        .into_diagnostic()
        .wrap_err_with(|| {
            miette!(
                "Failed to create missing log directory at {}.",
                log_file_output_directory.display()
            )
        })?;

    let file_appender =
        tracing_appender::rolling::daily(log_file_output_directory, log_file_name_prefix);
    let (non_blocking_file_writer, guard) = tracing_appender::non_blocking(file_appender);


    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_level_filter);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking_file_writer)
        .with_filter(log_file_level_filter);


    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("Failed to install global tracing subscriber.")?;

    Ok(guard)
}
