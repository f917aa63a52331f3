//! QC report rendering.
//!
//! The report is plain UTF-8 text: a count summary followed by one block per
//! file in scan order.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{DEFAULT_REPORT_NAME, REPORT_SUFFIX};
use crate::error::CoreResult;

use super::MediaInfo;

const BANNER_WIDTH: usize = 60;

/// Aggregate counts over a set of scan results.
///
/// `warned` and `errored` overlap: a file with both findings is counted in
/// each. `passed` is `total - errored - warned + both`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub warned: usize,
    pub errored: usize,
    pub both: usize,
}

impl ReportSummary {
    pub fn from_results(results: &[MediaInfo]) -> Self {
        let total = results.len();
        let errored = results.iter().filter(|r| r.has_errors()).count();
        let warned = results.iter().filter(|r| r.has_warnings()).count();
        let both = results
            .iter()
            .filter(|r| r.has_errors() && r.has_warnings())
            .count();
        // Added before subtracting so the unsigned arithmetic cannot underflow.
        let passed = total + both - errored - warned;

        Self {
            total,
            passed,
            warned,
            errored,
            both,
        }
    }
}

/// Default report location for a scan target.
///
/// A directory gets `{dir}/QC_报告.txt`; a file gets
/// `{parent}/{stem}_QC_报告.txt`.
pub fn default_report_path(target: &Path) -> PathBuf {
    if target.is_dir() {
        return target.join(DEFAULT_REPORT_NAME);
    }
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = target.parent().unwrap_or_else(|| Path::new(""));
    parent.join(format!("{stem}{REPORT_SUFFIX}.txt"))
}

/// Renders the report text for `results`.
///
/// Lines are joined with `\n`; the text has no trailing newline.
pub fn render_report(results: &[MediaInfo]) -> String {
    let summary = ReportSummary::from_results(results);
    let banner = "=".repeat(BANNER_WIDTH);

    let mut lines = vec![
        banner.clone(),
        "MediaKit - Media Quality Report (QC Report)".to_string(),
        banner.clone(),
        String::new(),
        format!("Total scanned: {} file(s)", summary.total),
        format!("  ✓ Passed: {}", summary.passed),
        format!("  ⚠ Warnings: {}", summary.warned),
        format!("  ✗ Errors: {}", summary.errored),
        String::new(),
        "-".repeat(BANNER_WIDTH),
    ];

    for info in results {
        let icon = if info.has_errors() {
            "✗"
        } else if info.has_warnings() {
            "⚠"
        } else {
            "✓"
        };

        lines.push(String::new());
        lines.push(format!("[{icon}] {}", info.filename));
        lines.push(format!("    Path: {}", info.path.display()));
        if info.is_valid {
            lines.push(format!(
                "    Container: {} | Codec: {} | Resolution: {}x{}",
                info.container, info.video_codec, info.width, info.height
            ));
            lines.push(format!(
                "    Frame rate: {} FPS | Bitrate: {} kbps | Duration: {:.1}s",
                info.fps, info.bitrate_kbps, info.duration_secs
            ));
        }
        lines.extend(info.errors.iter().map(|e| format!("    [ERROR] {e}")));
        lines.extend(info.warnings.iter().map(|w| format!("    [WARN] {w}")));
    }

    lines.push(String::new());
    lines.push(banner.clone());
    lines.push("Report complete".to_string());
    lines.push(banner);
    lines.join("\n")
}

/// Renders the report, writes it to `output_path` and returns the text.
///
/// Parent directories are created as needed.
pub fn generate_report(results: &[MediaInfo], output_path: &Path) -> CoreResult<String> {
    let text = render_report(results);
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output_path, &text)?;
    log::info!("QC report saved to: {}", output_path.display());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn result(name: &str, warnings: usize, errors: usize) -> MediaInfo {
        let mut info = MediaInfo::new(format!("/media/{name}"));
        info.warnings = (0..warnings).map(|i| format!("warning {i}")).collect();
        info.errors = (0..errors).map(|i| format!("error {i}")).collect();
        info
    }

    #[test]
    fn test_summary_arithmetic() {
        let results = vec![
            result("clean.mp4", 0, 0),
            result("warn.mkv", 2, 0),
            result("err.webp", 0, 1),
            result("both.webp", 1, 1),
            result("clean2.mov", 0, 0),
        ];
        let s = ReportSummary::from_results(&results);
        assert_eq!(s.total, 5);
        assert_eq!(s.warned, 2);
        assert_eq!(s.errored, 2);
        assert_eq!(s.both, 1);
        assert_eq!(s.passed, s.total - s.errored - s.warned + s.both);
        assert_eq!(s.passed, 2);
    }

    #[test]
    fn test_summary_all_both() {
        let results = vec![result("a.webp", 1, 1), result("b.webp", 3, 2)];
        let s = ReportSummary::from_results(&results);
        assert_eq!(s.passed, 0);
        assert_eq!(s.both, 2);
    }

    #[test]
    fn test_render_orders_errors_before_warnings() {
        let mut info = result("both.webp", 1, 1);
        info.width = 10;
        info.height = 20;
        let text = render_report(&[info]);

        let err_pos = text.find("[ERROR] error 0").unwrap();
        let warn_pos = text.find("[WARN] warning 0").unwrap();
        assert!(err_pos < warn_pos);
        assert!(text.contains("[✗] both.webp"));
        assert!(text.contains("Resolution: 10x20"));
        assert!(text.contains("Duration: 0.0s"));
    }

    #[test]
    fn test_render_layout_has_header_and_footer() {
        let text = render_report(&[]);
        let lines: Vec<&str> = text.lines().collect();
        let banner = "=".repeat(BANNER_WIDTH);

        assert_eq!(lines[0], banner);
        assert_eq!(lines[1], "MediaKit - Media Quality Report (QC Report)");
        assert_eq!(lines[4], "Total scanned: 0 file(s)");
        assert_eq!(lines[lines.len() - 2], "Report complete");
        assert!(text.ends_with(&banner));
    }

    #[test]
    fn test_render_invalid_omits_technical_summary() {
        let info = MediaInfo::invalid("/media/broken.mp4", "Cannot read file: boom");
        let text = render_report(&[info]);
        assert!(!text.contains("Container:"));
        assert!(text.contains("[ERROR] Cannot read file: boom"));
    }

    #[test]
    fn test_generate_report_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports/nested/QC.txt");
        let text = generate_report(&[result("a.mp4", 0, 0)], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
        assert!(text.contains("✓ Passed: 1"));
    }

    #[test]
    fn test_default_report_path() {
        let dir = tempdir().unwrap();
        assert_eq!(default_report_path(dir.path()), dir.path().join("QC_报告.txt"));

        let file = dir.path().join("clip.mp4");
        std::fs::write(&file, b"x").unwrap();
        assert_eq!(default_report_path(&file), dir.path().join("clip_QC_报告.txt"));
    }
}
