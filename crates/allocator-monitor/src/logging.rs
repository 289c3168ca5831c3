//! Logging setup.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Setup logging with the given level.
///
/// With `file` set, events are also written without colours to a daily
/// rolling file next to it. The returned guard flushes that file on drop
/// and must be held for the lifetime of the program.
pub fn setup_logging(level: &str, json: bool, file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let prefix = path
                .file_name()
                .map(|name| name.to_os_string())
                .unwrap_or_else(|| "allocator.log".into());
            let appender = tracing_appender::rolling::daily(directory, prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().pretty()).init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logging_returns_guard() {
        let dir = std::env::temp_dir().join(format!("allocator-logs-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let guard = setup_logging("info", false, Some(&dir.join("allocator.log")));
        assert!(guard.is_some());
        drop(guard);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
