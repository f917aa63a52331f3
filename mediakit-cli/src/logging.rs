// ============================================================================
// mediakit-cli/src/logging.rs
// ============================================================================
//
// LOGGING UTILITIES: Log file naming and logger startup for the CLI
//
// The logger itself is configured by `mediakit_core::logging`; this module
// decides the level and the per-run log file name.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::LevelFilter;

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// `{log_dir}/mediakit_{command}_{timestamp}.log`
pub fn log_file_path(log_dir: &Path, command: &str, timestamp: &str) -> PathBuf {
    log_dir.join(format!("mediakit_{}_{}.log", command, timestamp))
}

/// Installs the logger for one CLI run and returns the log file, if any.
pub fn init(verbose: bool, log_dir: Option<&Path>, command: &str) -> Result<Option<PathBuf>> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_file = log_dir.map(|dir| log_file_path(dir, command, &get_timestamp()));

    mediakit_core::logging::setup_logging(level, log_file.as_deref())
        .context("Failed to initialize logging")?;
    Ok(log_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_path() {
        assert_eq!(
            log_file_path(Path::new("/logs"), "qc", "20240601_123045"),
            PathBuf::from("/logs/mediakit_qc_20240601_123045.log")
        );
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = get_timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(ts.as_bytes()[8], b'_');
    }
}
