// ============================================================================
// mediakit-core/src/qc/mod.rs
// ============================================================================
//
// QUALITY CONTROL: Media scanning, rule evaluation and reporting
//
// The QC scanner walks a directory, probes every matching file with ffprobe,
// evaluates a configurable rule set against the probed attributes and renders
// a plain-text report.
//
// KEY COMPONENTS:
// - MediaInfo: Per-file scan result (technical attributes + findings)
// - probe: Metadata extraction via an FfprobeExecutor
// - rules: Threshold and compatibility rule evaluation
// - signature: Magic-number sniffing for extension mismatches
// - scan: Directory walk tying probe and evaluation together
// - report: Report text generation and persistence
//
// A single file's failure never aborts a scan. Probe failures become a
// MediaInfo with `is_valid == false` and a populated error list.

use std::path::{Path, PathBuf};

pub mod probe;
pub mod report;
pub mod rules;
pub mod scan;
pub mod signature;

pub use probe::{parse_frame_rate, parse_probe_data, probe};
pub use report::{ReportSummary, default_report_path, generate_report, render_report};
pub use rules::{evaluate, parse_resolution};
pub use scan::{scan_directory, scan_path};
pub use signature::{SignatureMatch, check_signature, sniff_signature};

/// Scan result for a single media file.
///
/// `filename` and `container` are derived from the path at construction and
/// are never changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub path: PathBuf,
    pub filename: String,
    /// Lowercased extension including the leading dot (e.g. `.mp4`)
    pub container: String,
    pub duration_secs: f64,
    pub video_codec: String,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub bitrate_kbps: u64,
    pub audio_codec: String,
    pub audio_bitrate_kbps: u64,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub is_valid: bool,
    evaluated: bool,
}

impl MediaInfo {
    /// Creates an empty, valid result for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let container = container_of(&path);
        Self {
            path,
            filename,
            container,
            duration_secs: 0.0,
            video_codec: String::new(),
            width: 0,
            height: 0,
            fps: 0.0,
            bitrate_kbps: 0,
            audio_codec: String::new(),
            audio_bitrate_kbps: 0,
            warnings: Vec::new(),
            errors: Vec::new(),
            is_valid: true,
            evaluated: false,
        }
    }

    /// Creates a result for a file that could not be probed.
    ///
    /// All technical attributes stay zero or empty.
    pub fn invalid(path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        let mut info = Self::new(path);
        info.is_valid = false;
        info.errors.push(error.into());
        info
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// True when no rule produced a finding.
    pub fn passed(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Whether rule evaluation has already run on this result.
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    pub(crate) fn mark_evaluated(&mut self) {
        self.evaluated = true;
    }
}

/// Lowercased extension of `path` with a leading dot, or empty.
pub(crate) fn container_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
