//! Structured logging setup with tracing

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_PREFIX: &str = "imgshow";

/// Logging switches chosen by the caller's setup phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Raise the default level from `info` to `debug`
    pub debug: bool,
    /// Also write human-readable output to stderr
    pub console: bool,
}

impl LogOptions {
    /// Filter directive used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

/// Initialize the logging system
pub fn init_logging(options: LogOptions) -> anyhow::Result<WorkerGuard> {
    let log_dir = super::log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = daily_appender(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_directive()));

    let console = options
        .console
        .then(|| fmt::layer().with_writer(std::io::stderr).with_target(false));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(fmt::layer().json().with_writer(non_blocking))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Logging already initialized: {}", e))?;

    tracing::debug!("Logging initialized in {:?}", log_dir);
    Ok(guard)
}

/// Daily rolling appender writing `imgshow.YYYY-MM-DD.log`
fn daily_appender(log_dir: &Path) -> anyhow::Result<RollingFileAppender> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(log_dir)?;
    Ok(appender)
}

/// Rotated log files end in `.log`; older layouts put the date after it
fn is_log_file(path: &Path) -> bool {
    let rotated_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| n.starts_with(&format!("{}.log.", LOG_PREFIX)));
    rotated_name || path.extension().map_or(false, |ext| ext == "log")
}

/// Clean up log files older than specified days
pub fn cleanup_old_logs(days: u32) -> anyhow::Result<usize> {
    cleanup_old_logs_in(&super::log_dir(), days)
}

/// Clean up `.log` files in `log_dir` older than specified days
pub fn cleanup_old_logs_in(log_dir: &Path, days: u32) -> anyhow::Result<usize> {
    use std::time::{Duration, SystemTime};

    if !log_dir.exists() {
        return Ok(0);
    }

    let threshold = SystemTime::now() - Duration::from_secs(days as u64 * 24 * 60 * 60);
    let mut deleted = 0;

    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();

        if is_log_file(&path) {
            let modified = entry.metadata().and_then(|m| m.modified());
            if let Ok(modified) = modified {
                if modified < threshold && std::fs::remove_file(&path).is_ok() {
                    deleted += 1;
                    tracing::debug!("Deleted old log: {:?}", path);
                }
            }
        }
    }

    tracing::info!("Cleaned up {} old log files", deleted);
    Ok(deleted)
}
