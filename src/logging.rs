use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Routes tracing output to `<cache_dir>/nightly/nightly.log`; the terminal belongs to the UI.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init() -> Option<WorkerGuard> {
    let dir = log_dir();
    fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::never(&dir, "nightly.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("NIGHTLY_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(writer)
        .try_init()
        .ok()?;

    Some(guard)
}

fn log_dir() -> PathBuf {
    let mut path = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("nightly");
    path
}
