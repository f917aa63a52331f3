//! Core library for media production chores built on ffmpeg and ffprobe.
//!
//! This crate provides media quality scanning (QC), batch renaming of
//! images and videos, folder creation from text lists, image format
//! conversion, ffmpeg command construction for encode/remux/audio jobs and
//! task-complete notifications.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use mediakit_core::config::{QcRules, ToolPaths};
//! use mediakit_core::external::ProcessFfprobeExecutor;
//! use mediakit_core::qc::{default_report_path, generate_report, scan_path};
//! use std::path::Path;
//!
//! let tools = ToolPaths::default();
//! let executor = ProcessFfprobeExecutor::new(&tools.ffprobe);
//! let rules = QcRules {
//!     max_bitrate_kbps: 20_000,
//!     max_resolution: "1920x1080".to_string(),
//!     ..Default::default()
//! };
//!
//! let target = Path::new("/path/to/deliverables");
//! let results = scan_path(&executor, target, &rules, |_, _, _| {}).unwrap();
//! let report = generate_report(&results, &default_report_path(target)).unwrap();
//! println!("{report}");
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod external;
pub mod folders;
pub mod images;
pub mod logging;
pub mod media_ops;
pub mod notifications;
pub mod qc;
pub mod rename;
pub mod terminal_output;
pub mod utils;

// Re-exports for public API
pub use batch::{BatchOutcome, ERROR_PREVIEW_LIMIT, error_preview};
pub use config::{QcRules, RenameConfig, RenameConfigBuilder, RenameMode, RenameTarget, ToolPaths};
pub use error::{CoreError, CoreResult};
pub use folders::{FolderOptions, create_folders};
pub use images::{ImageConvertOptions, convert_images};
pub use notifications::{NotifyConfig, NotifyConfigStore, send_task_complete};
pub use qc::{MediaInfo, ReportSummary, evaluate, generate_report, scan_directory, scan_path};
pub use rename::{RenameReport, batch_rename};
pub use utils::{file_name_lossy, format_bytes, format_duration};
