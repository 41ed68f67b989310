/// Logging setup.
///
/// With a log directory, logs go to `{log_dir}/ytc.log` and each CLI session
/// appends a separator line. Without one, logs go to stderr.
use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "ytc.log";

/// Initializes the global tracing subscriber.
///
/// # Arguments
///
/// * `log_dir` - Directory for the log file; `None` logs to stderr
/// * `session_label` - Short description written into the session separator
pub fn init_logging(log_dir: Option<&Path>, session_label: &str) -> Result<()> {
    // Default to INFO level, but allow override via RUST_LOG env var
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,ytc=debug"));

    let Some(log_dir) = log_dir else {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()
            .ok(); // Ignore error if already initialized
        return Ok(());
    };

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false) // No ANSI codes in log files
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .ok();

    let separator = format!(
        "\n{sep}\n[{ts}] New session: {label}\n{sep}\n",
        sep = "=".repeat(80),
        ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        label = session_label
    );

    use std::io::Write;
    if let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILE_NAME))
    {
        let _ = writeln!(file, "{}", separator);
    }

    tracing::info!("Logging initialized for session: {}", session_label);

    Ok(())
}
