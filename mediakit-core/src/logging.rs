// ============================================================================
// mediakit-core/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: log4rs configuration for console and log file
//
// Library code only talks to the `log` facade. Binaries call `setup_logging`
// once at startup. The console shows message-only lines on stderr and stays
// quiet below WARN unless debug output is requested, since user-facing
// progress goes through `terminal_output`. The optional log file records
// everything at the requested level with timestamps.

use std::path::Path;

use anyhow::Result;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

/// Pattern used for log files.
pub const FILE_LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {m}{n}";

const CONSOLE_LOG_PATTERN: &str = "{m}{n}";

/// Level shown on the console for a requested level.
fn console_level(level: LevelFilter) -> LevelFilter {
    if level >= LevelFilter::Debug {
        level
    } else {
        level.min(LevelFilter::Warn)
    }
}

/// Builds the log4rs configuration without installing it.
pub fn build_config(level: LevelFilter, log_file: Option<&Path>) -> Result<Config> {
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(CONSOLE_LOG_PATTERN)))
        .build();

    let mut builder = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(console_level(level))))
            .build("console", Box::new(console)),
    );
    let mut root = Root::builder().appender("console");

    if let Some(log_file) = log_file {
        if let Some(parent) = log_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file_appender = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(FILE_LOG_PATTERN)))
            .build(log_file)?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file_appender)));
        root = root.appender("file");
    }

    Ok(builder.build(root.build(level))?)
}

/// Installs the global logger.
///
/// # Arguments
///
/// * `level` - Maximum level recorded
/// * `log_file` - Optional log file; its parent directory is created
pub fn setup_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let config = build_config(level, log_file)?;
    log4rs::init_config(config)?;
    if let Some(log_file) = log_file {
        log::debug!("Logging to {}", log_file.display());
    }
    Ok(())
}
