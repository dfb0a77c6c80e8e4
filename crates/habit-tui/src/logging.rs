use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a file-backed subscriber. The terminal belongs to the TUI, so
/// without a log file nothing is installed.
///
/// The returned guard flushes buffered lines on drop and must outlive the UI.
pub fn init_logging(level: &str, file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let Some(file) = file else {
        return Ok(None);
    };

    let dir = file.parent().unwrap_or_else(|| Path::new("."));
    let name = file
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid log file path: {:?}", file))?;
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(level)
        .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", level, e))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    tracing::info!(target: "habit_tui", "Logging to {:?} at level {}", file, level);
    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_file_installs_nothing() {
        assert!(init_logging("info", None).unwrap().is_none());
    }

    #[test]
    fn test_invalid_filter_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("habit-tui.log");
        assert!(init_logging("habit_tui=loud", Some(&file)).is_err());
    }

    #[test]
    fn test_creates_log_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("logs").join("nested").join("habit-tui.log");

        let guard = init_logging("debug", Some(&file)).unwrap();
        assert!(guard.is_some());
        assert!(file.parent().unwrap().is_dir());
        drop(guard);
        assert!(file.exists());
    }
}
