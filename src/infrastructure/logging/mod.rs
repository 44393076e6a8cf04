// Logging module - Logging infrastructure
use crate::domain::error::{NetConError, NetConResult};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Where log records are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error, for commands that do not own the terminal
    Stderr,
    /// Append to a file
    File(PathBuf),
    /// Drop everything; the TUI owns the terminal and no file was configured
    Discard,
}

/// Initialize logging system
pub fn init_logging(level: &str, target: &LogTarget) -> NetConResult<()> {
    let (writer, ansi) = match target {
        LogTarget::Stderr => (BoxMakeWriter::new(io::stderr), true),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| NetConError::Config {
                    message: format!("Failed to open log file {}: {}", path.display(), e),
                })?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        LogTarget::Discard => (BoxMakeWriter::new(io::sink), false),
    };

    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| NetConError::Config {
            message: format!("Failed to initialize logging: {}", e),
        })?;

    tracing::info!("NetCon logging system initialized");
    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("netcon={},warn", level)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_target_is_created() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("netcon.log");

        // Another test may already own the global subscriber; the file is
        // opened before that matters
        let _ = init_logging("debug", &LogTarget::File(path.clone()));
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_log_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("netcon.log");

        let err = init_logging("info", &LogTarget::File(path)).unwrap_err();
        assert!(err.to_string().contains("Failed to open log file"));
    }
}
