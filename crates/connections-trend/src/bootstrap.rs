use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a Python-style level name onto a tracing filter directive.
///
/// Unrecognised names are passed through lowercased so that full
/// `EnvFilter` directives such as `"trend_data=debug"` keep working.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Events go to `log_file` when given (truncated on start, no ANSI colours),
/// otherwise to stderr. Falls back to `"info"` if the level is not a valid
/// directive.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let (stderr_layer, file_layer) = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (None, Some(layer))
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            (Some(layer), None)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialise logging")?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_directive_python_names() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
        assert_eq!(level_directive("CRITICAL"), "error");
    }

    #[test]
    fn test_level_directive_passes_through_directives() {
        assert_eq!(level_directive("trend_data=DEBUG"), "trend_data=debug");
    }

    #[test]
    fn test_setup_logging_writes_to_file() {
        let tmp = TempDir::new().expect("tempdir");
        let log_path = tmp.path().join("trend.log");

        setup_logging("INFO", Some(&log_path)).expect("logging should initialise");
        tracing::warn!("log file smoke test");

        let contents = std::fs::read_to_string(&log_path).expect("log file exists");
        assert!(contents.contains("log file smoke test"));

        // The global subscriber can only be installed once.
        assert!(setup_logging("INFO", None).is_err());
    }

    #[test]
    fn test_setup_logging_unwritable_path_fails() {
        let tmp = TempDir::new().expect("tempdir");
        let log_path = tmp.path().join("missing-dir").join("trend.log");
        assert!(setup_logging("INFO", Some(&log_path)).is_err());
    }
}
