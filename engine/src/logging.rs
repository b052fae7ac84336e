use std::env;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "discovery.log";

/// Console logging filtered by `RUST_LOG` (default `info`). When `log_dir` is
/// set, also writes a daily-rolling `discovery.log` there.
///
/// Keep the returned guard alive for the life of the process or buffered file
/// lines are lost on exit.
pub fn init(log_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter = || EnvFilter::new(env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()));

    match log_dir {
        Some(dir) if !dir.trim().is_empty() => {
            let (writer, guard) = file_writer(dir);

            tracing_subscriber::registry()
                .with(fmt::layer().with_filter(filter()))
                .with(fmt::layer().with_ansi(false).with_writer(writer).with_filter(filter()))
                .init();
            Some(guard)
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter()).init();
            None
        }
    }
}

/// Daily-rolling file writer; lines are flushed when the guard drops
fn file_writer(dir: &str) -> (NonBlocking, WorkerGuard) {
    tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_logs(dir: &std::path::Path) -> String {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| std::fs::read_to_string(entry.unwrap().path()).ok())
            .collect()
    }

    #[test]
    fn test_dropping_guard_flushes_file_lines() {
        let dir = tempfile::tempdir().unwrap();
        let (writer, guard) = file_writer(dir.path().to_str().unwrap());

        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(writer)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("❌ CRITICAL: Failed to load config: bad url");
        });

        drop(guard);
        assert!(read_logs(dir.path()).contains("Failed to load config: bad url"));
    }
}
