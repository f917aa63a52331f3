//! Utility functions for formatting and paths.
//!
//! Small helpers shared by the library and the CLI: duration and byte
//! formatting for summaries, lossy file-name extraction for messages, and the
//! directory walk shared by the scanner and the renamer.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{CoreError, CoreResult};

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// File name as a `String`, or the whole path when there is none.
#[must_use]
pub fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Regular files yielded by `walker`, in walk order.
///
/// A failure at the walk root aborts with `CoreError::Walkdir`. Unreadable
/// entries below the root are logged and skipped.
pub fn walk_files(walker: WalkDir) -> CoreResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) if e.depth() == 0 => return Err(CoreError::Walkdir(e)),
            Err(e) => log::warn!("Skipping unreadable entry: {}", e),
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(59.9), "00:00:59");
        assert_eq!(format_duration(3725.0), "01:02:05");
        assert_eq!(format_duration(90061.0), "25:01:01");
        assert_eq!(format_duration(-1.0), "??:??:??");
        assert_eq!(format_duration(f64::NAN), "??:??:??");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.00 KiB");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MiB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GiB");
    }

    #[test]
    fn test_file_name_lossy() {
        assert_eq!(file_name_lossy(Path::new("/a/b/镜头.mp4")), "镜头.mp4");
        assert_eq!(file_name_lossy(Path::new("/")), "/");
    }

    #[test]
    fn test_walk_files_skips_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/a.mp4"), b"x").unwrap();

        let files = walk_files(WalkDir::new(dir.path())).unwrap();
        assert_eq!(files, vec![dir.path().join("sub/a.mp4")]);
    }

    #[test]
    fn test_walk_files_missing_root_is_walk_error() {
        let dir = tempdir().unwrap();
        let result = walk_files(WalkDir::new(dir.path().join("gone")).min_depth(1));
        assert!(matches!(result, Err(CoreError::Walkdir(_))));
    }
}
